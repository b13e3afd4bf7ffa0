//! Nearest-reference matching over a labeled descriptor set.

use crate::types::{Descriptor, LabeledDescriptor, MatchResult};

/// Largest Euclidean distance (exclusive) at which a face is still
/// attributed to a reference identity.
pub const ACCEPTANCE_THRESHOLD: f32 = 0.6;

/// Matches probe descriptors against a fixed reference set.
///
/// Every reference is compared; the closest one wins and ties go to the
/// earliest reference, so results are reproducible for a given set.
#[derive(Debug, Clone)]
pub struct FaceMatcher {
    references: Vec<LabeledDescriptor>,
    threshold: f32,
}

impl FaceMatcher {
    pub fn new(references: Vec<LabeledDescriptor>, threshold: f32) -> Self {
        Self {
            references,
            threshold,
        }
    }

    pub fn references(&self) -> &[LabeledDescriptor] {
        &self.references
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Find the closest reference for `probe`.
    ///
    /// Returns an unknown result when the reference set is empty or the best
    /// distance is not strictly below the threshold.
    pub fn find_best_match(&self, probe: &Descriptor) -> MatchResult {
        let mut best: Option<(usize, f32)> = None;

        for (i, reference) in self.references.iter().enumerate() {
            let distance = probe.euclidean_distance(&reference.descriptor);
            let closer = match best {
                None => true,
                Some((_, best_distance)) => distance < best_distance,
            };
            if closer {
                best = Some((i, distance));
            }
        }

        match best {
            Some((idx, distance)) if distance < self.threshold => MatchResult {
                label: Some(self.references[idx].label.clone()),
                distance,
            },
            Some((_, distance)) => MatchResult {
                label: None,
                distance,
            },
            None => MatchResult {
                label: None,
                distance: f32::INFINITY,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(label: &str, values: Vec<f32>) -> LabeledDescriptor {
        LabeledDescriptor::new(label, Descriptor::new(values))
    }

    #[test]
    fn test_best_match_picks_closest() {
        let matcher = FaceMatcher::new(
            vec![
                reference("Reference 1", vec![1.0, 0.0, 0.0]),
                reference("Reference 2", vec![0.0, 1.0, 0.0]),
                reference("Reference 3", vec![0.0, 0.0, 1.0]),
            ],
            ACCEPTANCE_THRESHOLD,
        );

        let result = matcher.find_best_match(&Descriptor::new(vec![0.0, 0.1, 1.0]));
        assert_eq!(result.label.as_deref(), Some("Reference 3"));
        assert!((result.distance - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_best_match_beyond_threshold_is_unknown() {
        let matcher = FaceMatcher::new(
            vec![reference("Reference 1", vec![1.0, 0.0])],
            ACCEPTANCE_THRESHOLD,
        );

        let result = matcher.find_best_match(&Descriptor::new(vec![0.0, 1.0]));
        assert!(result.is_unknown());
        assert!((result.distance - 2.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let matcher = FaceMatcher::new(vec![reference("Reference 1", vec![0.0])], 0.5);
        assert!(matcher.find_best_match(&Descriptor::new(vec![0.5])).is_unknown());
        assert!(!matcher.find_best_match(&Descriptor::new(vec![0.49])).is_unknown());
    }

    #[test]
    fn test_tie_goes_to_first_reference() {
        let matcher = FaceMatcher::new(
            vec![
                reference("Reference 1", vec![0.1, 0.0]),
                reference("Reference 2", vec![-0.1, 0.0]),
            ],
            ACCEPTANCE_THRESHOLD,
        );

        let probe = Descriptor::new(vec![0.0, 0.0]);
        let first = matcher.find_best_match(&probe);
        let second = matcher.find_best_match(&probe);
        assert_eq!(first.label.as_deref(), Some("Reference 1"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_reference_set() {
        let matcher = FaceMatcher::new(Vec::new(), ACCEPTANCE_THRESHOLD);
        let result = matcher.find_best_match(&Descriptor::new(vec![1.0]));
        assert!(result.is_unknown());
        assert!(result.distance.is_infinite());
    }
}
