//! Declared competencies of the chatbot.

/// An ordered set of human-readable capability labels.
///
/// The set only feeds the text of the system directive. Duplicate labels
/// are dropped, keeping the first occurrence.
#[derive(Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct CapabilitySet {
    labels: Vec<String>,
}

impl CapabilitySet {
    /// Creates a set from labels in the given order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for label in labels {
            set.insert(label);
        }
        set
    }

    /// Adds a label at the end, returning `false` if it was already present.
    pub fn insert<S: Into<String>>(&mut self, label: S) -> bool {
        let label = label.into();
        if self.labels.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// Returns the labels in insertion order.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns whether `label` is in the set. Matching is exact.
    #[inline]
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Returns whether the set has no labels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Joins the labels with `", "`.
    #[inline]
    pub fn joined(&self) -> String {
        self.labels.join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_labels(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first() {
        let set: CapabilitySet =
            ["Python Expert", "Solution Design", "Python Expert"]
                .into_iter()
                .collect();
        assert_eq!(set.labels(), ["Python Expert", "Solution Design"]);
        assert_eq!(set.joined(), "Python Expert, Solution Design");
        assert!(set.contains("Solution Design"));
        assert!(!set.contains("python expert"));
    }
}
