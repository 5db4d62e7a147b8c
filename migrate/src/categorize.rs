//! Sorting legacy rows into category buckets.

use std::collections::BTreeMap;

use tracing::warn;

use crate::legacy::LegacyRow;
use crate::rules::Classifier;

/// The result of classifying a batch of legacy rows.
///
/// Every input row lands in exactly one place: a category bucket or the
/// unclassified list. Nothing is dropped and nothing is guessed at.
#[derive(Debug, Default)]
pub struct Categorized {
    /// Rows per target category, insertion order preserved within a bucket.
    pub buckets: BTreeMap<String, Vec<LegacyRow>>,
    /// Rows no rule matched. These need a human decision, not a default.
    pub unclassified: Vec<LegacyRow>,
}

impl Categorized {
    /// Total rows across buckets and the unclassified list.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum::<usize>() + self.unclassified.len()
    }
}

/// Classifies each row by its `Reference`, `Description`, and
/// `Component_Type` fields.
pub fn categorize(rows: Vec<LegacyRow>, classifier: &Classifier) -> Categorized {
    let mut out = Categorized::default();
    for row in rows {
        let reference = row.get("Reference").unwrap_or("");
        let description = row.get("Description").unwrap_or("");
        let component_type = row.get("Component_Type").unwrap_or("");

        match classifier.classify(reference, description, component_type) {
            Some(category) => out
                .buckets
                .entry(category.to_string())
                .or_default()
                .push(row),
            None => {
                warn!(
                    symbol = row.get("Symbol_Name").unwrap_or("?"),
                    reference, "no classification rule matched"
                );
                out.unclassified.push(row);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ClassificationRules;
    use partdb_core::SchemaRegistry;

    fn row(name: &str, reference: &str, description: &str) -> LegacyRow {
        let mut r = LegacyRow::default();
        r.set("Symbol_Name", Some(name));
        r.set("Reference", Some(reference));
        r.set("Description", Some(description));
        r
    }

    #[test]
    fn test_every_row_is_accounted_for() {
        let classifier =
            Classifier::new(ClassificationRules::default(), &SchemaRegistry::builtin()).unwrap();
        let rows = vec![
            row("R_10K", "R", "10K resistor"),
            row("U_AMP", "U", "op-amp"),
            row("X_OSC", "X", "crystal oscillator"),
            row("C_1U", "C", "1uF cap"),
        ];
        let n = rows.len();

        let result = categorize(rows, &classifier);
        assert_eq!(result.total(), n);
        assert_eq!(result.buckets["resistors"].len(), 1);
        assert_eq!(result.buckets["ic_opamp"].len(), 1);
        assert_eq!(result.buckets["capacitors"].len(), 1);
        assert_eq!(result.unclassified.len(), 1);
        assert_eq!(result.unclassified[0].get("Symbol_Name"), Some("X_OSC"));
    }

    #[test]
    fn test_bucket_keeps_input_order() {
        let classifier =
            Classifier::new(ClassificationRules::default(), &SchemaRegistry::builtin()).unwrap();
        let rows = vec![row("R_A", "R", ""), row("R_B", "R", ""), row("R_C", "R", "")];
        let result = categorize(rows, &classifier);
        let names: Vec<_> = result.buckets["resistors"]
            .iter()
            .map(|r| r.get("Symbol_Name").unwrap())
            .collect();
        assert_eq!(names, vec!["R_A", "R_B", "R_C"]);
    }
}
