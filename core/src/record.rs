use serde::{Deserialize, Serialize};

/// A crawled movie detail record. Transient: records feed index
/// construction and are discarded afterwards.
///
/// `title` is mandatory; deserializing a record without one fails. Every
/// other field defaults to empty, so a page the crawler could only
/// partially parse still indexes on whatever was extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// (actor, character) pairs in credits order.
    #[serde(default)]
    pub casts: Vec<(String, String)>,
}

/// A record field as a tree of string leaves. Containers nest arbitrarily;
/// `flatten` strips them back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    Seq(Vec<FieldValue>),
    /// Ordered (key, value) entries. Only values are indexed.
    Map(Vec<(String, FieldValue)>),
}

impl MovieRecord {
    /// The record's fields as values to index, in declaration order.
    pub fn field_values(&self) -> Vec<FieldValue> {
        let scalar_seq = |items: &[String]| {
            FieldValue::Seq(items.iter().cloned().map(FieldValue::Scalar).collect())
        };
        let casts = FieldValue::Seq(
            self.casts
                .iter()
                .map(|(actor, character)| {
                    FieldValue::Seq(vec![
                        FieldValue::Scalar(actor.clone()),
                        FieldValue::Scalar(character.clone()),
                    ])
                })
                .collect(),
        );
        vec![
            FieldValue::Scalar(self.title.clone()),
            FieldValue::Scalar(self.year.clone()),
            scalar_seq(&self.directors),
            scalar_seq(&self.genres),
            casts,
        ]
    }
}

/// Flattens a field value into its scalar leaves, depth-first, preserving
/// left-to-right order. Map keys are discarded; values are visited in entry
/// order. A scalar flattens to a one-element sequence, an empty container
/// to an empty one.
pub fn flatten(value: &FieldValue) -> Vec<String> {
    let mut leaves = Vec::new();
    collect_leaves(value, &mut leaves);
    leaves
}

fn collect_leaves(value: &FieldValue, leaves: &mut Vec<String>) {
    match value {
        FieldValue::Scalar(s) => leaves.push(s.clone()),
        FieldValue::Seq(items) => {
            for item in items {
                collect_leaves(item, leaves);
            }
        }
        FieldValue::Map(entries) => {
            for (_, v) in entries {
                collect_leaves(v, leaves);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> FieldValue {
        FieldValue::Scalar(s.to_string())
    }

    #[test]
    fn scalar_flattens_to_itself() {
        assert_eq!(flatten(&scalar("test_title")), vec!["test_title"]);
        assert_eq!(flatten(&scalar("1994")), vec!["1994"]);
    }

    #[test]
    fn empty_seq_flattens_to_nothing() {
        assert!(flatten(&FieldValue::Seq(vec![])).is_empty());
    }

    #[test]
    fn nested_containers_preserve_leaf_order() {
        // ["a", "b", [("c", "d")], [["e"], "f"]]
        let value = FieldValue::Seq(vec![
            scalar("a"),
            scalar("b"),
            FieldValue::Seq(vec![FieldValue::Seq(vec![scalar("c"), scalar("d")])]),
            FieldValue::Seq(vec![FieldValue::Seq(vec![scalar("e")]), scalar("f")]),
        ]);
        assert_eq!(flatten(&value), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn map_contributes_values_only() {
        // ["a", "b", [["c"]], {"d": "e", "f": "g"}]
        let value = FieldValue::Seq(vec![
            scalar("a"),
            scalar("b"),
            FieldValue::Seq(vec![FieldValue::Seq(vec![scalar("c")])]),
            FieldValue::Map(vec![
                ("d".to_string(), scalar("e")),
                ("f".to_string(), scalar("g")),
            ]),
        ]);
        assert_eq!(flatten(&value), vec!["a", "b", "c", "e", "g"]);
    }

    #[test]
    fn field_values_cover_every_field() {
        let record = MovieRecord {
            title: "movie1".into(),
            year: "1991".into(),
            directors: vec!["dir name1".into()],
            genres: vec!["drama".into()],
            casts: vec![("a1".into(), "c1".into())],
        };
        let leaves: Vec<String> = record.field_values().iter().flat_map(flatten).collect();
        assert_eq!(leaves, vec!["movie1", "1991", "dir name1", "drama", "a1", "c1"]);
    }

    #[test]
    fn record_without_title_fails_to_deserialize() {
        let err = serde_json::from_str::<MovieRecord>(r#"{"year": "1999"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let record: MovieRecord = serde_json::from_str(r#"{"title": "movie1"}"#).unwrap();
        assert!(record.directors.is_empty());
        assert!(record.casts.is_empty());
        assert_eq!(record.year, "");
    }
}
