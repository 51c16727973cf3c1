//! Per-document index level from its labels.

use crate::models::{DocumentSet, IndexLevel, LevelPolicy};

/// Give every document the lowest level implied by its labels.
///
/// Labels missing from the policy, and documents without labels, get
/// [`IndexLevel::Full`].
pub fn assign_index_levels(documents: &mut DocumentSet, policy: &LevelPolicy) {
    for doc in documents.values_mut() {
        doc.index_level = doc
            .labels
            .iter()
            .map(|label| policy.level_for(&label.name))
            .min()
            .unwrap_or(IndexLevel::Full);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, Label};
    use std::collections::BTreeMap;

    fn policy(entries: &[(&str, &str)]) -> LevelPolicy {
        let labels: BTreeMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LevelPolicy::from_config(&labels).unwrap()
    }

    fn doc_with_labels(name: &str, labels: &[&str]) -> Document {
        let mut doc = Document::new(name);
        doc.labels = labels.iter().map(|l| Label::parse(l)).collect();
        doc
    }

    #[test]
    fn lowest_label_level_wins() {
        let policy = policy(&[("work", "index"), ("secret", "data"), ("spam", "ignored")]);
        let mut docs = DocumentSet::new();
        for doc in [
            doc_with_labels("a", &["work,red"]),
            doc_with_labels("b", &["work,red", "secret,#000"]),
            doc_with_labels("c", &["spam,x", "secret,y"]),
            doc_with_labels("d", &["holiday,blue"]),
            doc_with_labels("e", &[]),
            doc_with_labels("f", &["work"]),
            doc_with_labels("g", &["holiday,blue", "spam"]),
        ] {
            docs.insert(doc.name.clone(), doc);
        }
        for doc in docs.values_mut() {
            doc.index_level = IndexLevel::Ignored;
        }

        assign_index_levels(&mut docs, &policy);

        assert_eq!(docs["a"].index_level, IndexLevel::Index);
        assert_eq!(docs["b"].index_level, IndexLevel::Data);
        assert_eq!(docs["c"].index_level, IndexLevel::Ignored);
        assert_eq!(docs["d"].index_level, IndexLevel::Full);
        assert_eq!(docs["e"].index_level, IndexLevel::Full);
        assert_eq!(docs["f"].index_level, IndexLevel::Index);
        assert_eq!(docs["g"].index_level, IndexLevel::Ignored);
    }
}
