use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result, Stage};

/// LabelSpace
/// Bijection between label strings and dense class ids, built once from the
/// training labels. Ids are assigned in first-seen order.
/// Training class counts are kept so the majority class can be answered
/// without the training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSpace {
    #[serde(with = "indexmap::map::serde_seq")]
    labels: IndexMap<String, u64>,
}

impl LabelSpace {
    /// Build from training labels
    ///
    /// # Errors
    /// * `DegenerateInput` when there are no labels or fewer than 2 distinct ones
    pub fn fit<T>(labels: &[T]) -> Result<Self>
    where
        T: AsRef<str>,
    {
        if labels.is_empty() {
            return Err(ClassifierError::degenerate(
                Stage::Train,
                "no training documents",
            ));
        }
        let mut map: IndexMap<String, u64> = IndexMap::new();
        for label in labels {
            *map.entry(label.as_ref().to_string()).or_insert(0) += 1;
        }
        if map.len() < 2 {
            return Err(ClassifierError::degenerate(
                Stage::Train,
                format!("need at least 2 distinct labels, found {}", map.len()),
            ));
        }
        Ok(Self { labels: map })
    }

    #[inline]
    pub fn id_of(&self, label: &str) -> Option<usize> {
        self.labels.get_index_of(label)
    }

    /// Map a label or fail with `UnknownLabel`
    pub fn require_id(&self, label: &str, stage: Stage) -> Result<usize> {
        self.id_of(label).ok_or_else(|| ClassifierError::UnknownLabel {
            stage,
            label: label.to_string(),
        })
    }

    #[inline]
    pub fn label_of(&self, id: usize) -> Option<&str> {
        self.labels.get_index(id).map(|(l, _)| l.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    /// Most frequent training class, ties broken by the lowest id
    pub fn majority_class(&self) -> usize {
        let mut best = 0;
        for (id, &count) in self.labels.values().enumerate() {
            if count > self.labels[best] {
                best = id;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijection_in_first_seen_order() {
        let space = LabelSpace::fit(&["valid", "hoax", "valid"]).unwrap();
        assert_eq!(space.len(), 2);
        assert_eq!(space.id_of("valid"), Some(0));
        assert_eq!(space.id_of("hoax"), Some(1));
        for id in 0..space.len() {
            let label = space.label_of(id).unwrap();
            assert_eq!(space.id_of(label), Some(id));
        }
        assert_eq!(space.label_of(2), None);
    }

    #[test]
    fn majority_ties_go_to_lowest_id() {
        let space = LabelSpace::fit(&["a", "b", "b", "a"]).unwrap();
        assert_eq!(space.majority_class(), 0);
        let space = LabelSpace::fit(&["a", "b", "b"]).unwrap();
        assert_eq!(space.majority_class(), 1);
    }

    #[test]
    fn degenerate_label_sets() {
        let none: [&str; 0] = [];
        assert!(LabelSpace::fit(&none).is_err());
        assert!(matches!(
            LabelSpace::fit(&["hoax", "hoax"]),
            Err(ClassifierError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn unknown_label_is_reported() {
        let space = LabelSpace::fit(&["a", "b"]).unwrap();
        assert!(matches!(
            space.require_id("c", Stage::Evaluate),
            Err(ClassifierError::UnknownLabel { .. })
        ));
    }
}
