//! Declarative classification rules.
//!
//! Classification is data, not code: a reference-prefix map for discrete
//! components, and an ordered rule list for refining ICs by description
//! and component type. The built-in rule set covers the stock catalog;
//! a YAML file can replace any part of it without a rebuild.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use partdb_core::SchemaRegistry;

use crate::error::{MigrateError, Result};

/// One IC refinement rule. Rules are tried in order; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcRule {
    /// Target category table.
    pub category: String,
    /// Case-insensitive substrings matched against the description.
    #[serde(default)]
    pub description_keywords: Vec<String>,
    /// Case-insensitive substrings matched against the component type.
    #[serde(default)]
    pub type_keywords: Vec<String>,
    /// Case-insensitive prefixes matched against the component type.
    #[serde(default)]
    pub type_prefixes: Vec<String>,
}

/// The full classification rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRules {
    /// Reference-designator prefix to category, for discrete components.
    #[serde(default = "default_reference_map")]
    pub reference_map: BTreeMap<String, String>,
    /// Prefixes that mean "IC, refine further" (U, IC).
    #[serde(default = "default_ic_references")]
    pub ic_references: Vec<String>,
    /// Ordered IC refinement rules.
    #[serde(default = "default_ic_rules")]
    pub ic_rules: Vec<IcRule>,
    /// Category for ICs no rule matched.
    #[serde(default = "default_ic_fallback")]
    pub ic_fallback: String,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            reference_map: default_reference_map(),
            ic_references: default_ic_references(),
            ic_rules: default_ic_rules(),
            ic_fallback: default_ic_fallback(),
        }
    }
}

impl ClassificationRules {
    /// Loads rules from a YAML file. Omitted sections fall back to the
    /// built-in defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }
}

fn default_reference_map() -> BTreeMap<String, String> {
    [
        ("R", "resistors"),
        ("C", "capacitors"),
        ("L", "inductors"),
        ("FB", "ferrites"),
        ("Q", "transistors"),
        ("D", "diodes"),
        ("J", "connectors"),
        ("LED", "leds"),
        ("SW", "switches"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_ic_references() -> Vec<String> {
    vec!["U".to_string(), "IC".to_string()]
}

fn default_ic_fallback() -> String {
    "ic_analog".to_string()
}

fn default_ic_rules() -> Vec<IcRule> {
    fn rule(
        category: &str,
        description_keywords: &[&str],
        type_keywords: &[&str],
        type_prefixes: &[&str],
    ) -> IcRule {
        IcRule {
            category: category.to_string(),
            description_keywords: description_keywords.iter().map(|s| s.to_string()).collect(),
            type_keywords: type_keywords.iter().map(|s| s.to_string()).collect(),
            type_prefixes: type_prefixes.iter().map(|s| s.to_string()).collect(),
        }
    }
    vec![
        rule(
            "ic_opamp",
            &["op-amp", "opamp", "operational amplifier", "instrumentation amp"],
            &["opamp", "op-amp"],
            &[],
        ),
        rule(
            "ic_microcontrollers",
            &["microcontroller", "mcu", "stm32", "pic", "avr", "esp32", "rp2040"],
            &["microcontroller", "mcu"],
            &[],
        ),
        rule(
            "ic_logic",
            &["logic", "gate", "buffer", "latch", "flip-flop", "decoder", "mux"],
            &[],
            &["74"],
        ),
        rule(
            "ic_memory",
            &["memory", "sram", "dram", "flash", "eeprom", "fram"],
            &["memory", "sram", "eeprom"],
            &[],
        ),
        rule(
            "ic_drivers",
            &["driver", "gate driver", "led driver", "motor driver"],
            &["driver"],
            &[],
        ),
    ]
}

/// Compiled classifier. Validates rule targets against the registry once,
/// then answers classification queries without further lookups failing.
#[derive(Debug)]
pub struct Classifier {
    rules: ClassificationRules,
    prefix_re: Regex,
}

impl Classifier {
    /// Compiles a rule set, rejecting rules that target unregistered
    /// categories.
    pub fn new(rules: ClassificationRules, registry: &SchemaRegistry) -> Result<Self> {
        for target in rules
            .reference_map
            .values()
            .chain(rules.ic_rules.iter().map(|r| &r.category))
            .chain(std::iter::once(&rules.ic_fallback))
        {
            if !registry.contains(target) {
                return Err(MigrateError::UnknownRuleTarget(target.clone()));
            }
        }
        // Unanchored alpha run; references look like "R", "R12", "LED3".
        let prefix_re = Regex::new(r"^[A-Za-z]+").expect("static pattern");
        Ok(Self { rules, prefix_re })
    }

    /// Classifies one legacy component, or `None` if no rule applies.
    ///
    /// Unknown reference prefixes are deliberately not guessed at; they
    /// land in the unclassified bucket for a human to resolve.
    pub fn classify(
        &self,
        reference: &str,
        description: &str,
        component_type: &str,
    ) -> Option<&str> {
        let prefix = self
            .prefix_re
            .find(reference.trim())
            .map(|m| m.as_str().to_uppercase())?;

        if self.rules.ic_references.iter().any(|r| *r == prefix) {
            return Some(self.classify_ic(description, component_type));
        }
        self.rules.reference_map.get(&prefix).map(String::as_str)
    }

    fn classify_ic(&self, description: &str, component_type: &str) -> &str {
        let desc = description.to_lowercase();
        let ctype = component_type.to_lowercase();
        for rule in &self.rules.ic_rules {
            let hit = rule.description_keywords.iter().any(|k| desc.contains(k.as_str()))
                || rule.type_keywords.iter().any(|k| ctype.contains(k.as_str()))
                || rule.type_prefixes.iter().any(|p| ctype.starts_with(p.as_str()));
            if hit {
                return &rule.category;
            }
        }
        &self.rules.ic_fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(ClassificationRules::default(), &SchemaRegistry::builtin()).unwrap()
    }

    #[test]
    fn test_discrete_prefixes_map_directly() {
        let c = classifier();
        assert_eq!(c.classify("R12", "", ""), Some("resistors"));
        assert_eq!(c.classify("C3", "", ""), Some("capacitors"));
        assert_eq!(c.classify("FB1", "", ""), Some("ferrites"));
        assert_eq!(c.classify("LED4", "", ""), Some("leds"));
        assert_eq!(c.classify("sw2", "", ""), Some("switches"));
    }

    #[test]
    fn test_led_prefix_wins_over_inductor() {
        let c = classifier();
        assert_eq!(c.classify("LED1", "", ""), Some("leds"));
        assert_eq!(c.classify("L1", "", ""), Some("inductors"));
    }

    #[test]
    fn test_ic_rules_first_match_wins() {
        let c = classifier();
        // "op-amp driver" matches the op-amp rule before the driver rule.
        assert_eq!(c.classify("U1", "op-amp driver", ""), Some("ic_opamp"));
        assert_eq!(c.classify("U2", "gate driver", ""), Some("ic_drivers"));
    }

    #[test]
    fn test_ic_type_prefix_matches_74_series() {
        let c = classifier();
        assert_eq!(c.classify("U3", "", "74HC595"), Some("ic_logic"));
    }

    #[test]
    fn test_unmatched_ic_falls_back_to_analog() {
        let c = classifier();
        assert_eq!(c.classify("U9", "voltage reference", ""), Some("ic_analog"));
    }

    #[test]
    fn test_unknown_reference_is_unclassified() {
        let c = classifier();
        assert_eq!(c.classify("X1", "crystal", ""), None);
        assert_eq!(c.classify("", "", ""), None);
        assert_eq!(c.classify("42", "", ""), None);
    }

    #[test]
    fn test_rule_target_validated_against_registry() {
        let mut rules = ClassificationRules::default();
        rules
            .reference_map
            .insert("X".to_string(), "crystals".to_string());
        let err = Classifier::new(rules, &SchemaRegistry::builtin());
        assert!(matches!(err, Err(MigrateError::UnknownRuleTarget(t)) if t == "crystals"));
    }

    #[test]
    fn test_rules_round_trip_through_yaml() {
        let yaml = serde_yaml::to_string(&ClassificationRules::default()).unwrap();
        let parsed: ClassificationRules = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.ic_fallback, "ic_analog");
        assert_eq!(parsed.ic_rules.len(), 5);
    }

    #[test]
    fn test_rules_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(
            &path,
            "reference_map:\n  R: resistors\n  X: connectors\nic_fallback: ic_analog\n",
        )
        .unwrap();

        let rules = ClassificationRules::from_yaml_file(&path).unwrap();
        assert_eq!(rules.reference_map.get("X").unwrap(), "connectors");
        // Explicit reference_map replaces the default map entirely.
        assert!(!rules.reference_map.contains_key("C"));

        assert!(ClassificationRules::from_yaml_file(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let parsed: ClassificationRules =
            serde_yaml::from_str("ic_fallback: ic_logic\n").unwrap();
        assert_eq!(parsed.ic_fallback, "ic_logic");
        assert_eq!(parsed.reference_map.get("R").unwrap(), "resistors");
    }
}
