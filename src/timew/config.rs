//! The configuration section that Timewarrior writes ahead of the interval JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

const DEBUG: &str = "debug";
const VERBOSE: &str = "verbose";

/// A single value in the report configuration. Dotted keys such as `temp.report.start` become
/// nested maps, so `temp` holds a `Map` containing `report`, which holds a `Map` containing the
/// `start` leaf.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    String(String),
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// The parsed configuration section of a Timewarrior export. `debug` and `verbose` are always
/// present as booleans; everything else is a string leaf or a nested map.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    debug: bool,
    verbose: bool,
    #[serde(flatten)]
    values: BTreeMap<String, ConfigValue>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            debug: false,
            verbose: false,
            values: BTreeMap::new(),
        }
    }
}

impl ReportConfig {
    /// Parses `key: value` lines. Lines without a key or a value are skipped.
    pub(crate) fn parse(section: &str) -> Self {
        let mut config = ReportConfig::default();
        for line in section.lines() {
            let Some((key, value)) = line.split_once(": ") else {
                continue;
            };
            if key.is_empty() || value.is_empty() {
                continue;
            }
            match key {
                DEBUG => config.debug = value == "1",
                VERBOSE => config.verbose = value == "1",
                _ => config.insert(key, value),
            }
        }
        config
    }

    fn insert(&mut self, key: &str, value: &str) {
        let mut parts = key.split('.').peekable();
        let mut current = &mut self.values;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                current.insert(part.to_string(), ConfigValue::String(value.to_string()));
                return;
            }
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| ConfigValue::Map(BTreeMap::new()));
            current = match entry {
                ConfigValue::Map(map) => map,
                _ => {
                    trace!("Skipping config key '{key}' because '{part}' already holds a value");
                    return;
                }
            };
        }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Looks up a value by its dotted key, e.g. `temp.report.start`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        let mut parts = key.split('.');
        let mut value = self.values.get(parts.next()?)?;
        for part in parts {
            value = value.as_map()?.get(part)?;
        }
        Some(value)
    }

    /// Looks up a string leaf by its dotted key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    /// The top-level entries other than `debug` and `verbose`.
    pub fn values(&self) -> &BTreeMap<String, ConfigValue> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_keys() {
        let config = ReportConfig::parse(
            "temp.report.start: 20240228T000000Z\ntemp.report.end: 20240228T235959Z\n",
        );
        assert_eq!(
            config.get_str("temp.report.start"),
            Some("20240228T000000Z")
        );
        assert_eq!(config.get_str("temp.report.end"), Some("20240228T235959Z"));
        let report = config.get("temp.report").unwrap().as_map().unwrap();
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_debug_and_verbose() {
        let config = ReportConfig::parse("debug: 0\nverbose: 1");
        assert!(!config.debug());
        assert!(config.verbose());

        let config = ReportConfig::parse("debug: on\nverbose: yes");
        assert!(!config.debug());
        assert!(!config.verbose());
    }

    #[test]
    fn test_defaults() {
        let config = ReportConfig::parse("");
        assert!(!config.debug());
        assert!(!config.verbose());
        assert!(config.values().is_empty());
    }

    #[test]
    fn test_value_containing_separator() {
        let config = ReportConfig::parse("reports.day.label: a: b: c");
        assert_eq!(config.get_str("reports.day.label"), Some("a: b: c"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let config = ReportConfig::parse("no separator\n: orphan\nempty: \nkey:value\ngood: yes");
        assert_eq!(config.values().len(), 1);
        assert_eq!(config.get_str("good"), Some("yes"));
    }

    #[test]
    fn test_leaf_is_not_overwritten_by_nested_key() {
        let config = ReportConfig::parse("color: on\ncolor.theme: dark");
        assert_eq!(config.get_str("color"), Some("on"));
        assert!(config.get("color.theme").is_none());
    }

    #[test]
    fn test_crlf_lines() {
        let config = ReportConfig::parse("moco.domain: acme\r\nverbose: 1\r\n");
        assert_eq!(config.get_str("moco.domain"), Some("acme"));
        assert!(config.verbose());
    }

    #[test]
    fn test_serializes_as_nested_json() {
        let config = ReportConfig::parse("debug: 1\ntemp.report.start: x");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"debug": true, "verbose": false, "temp": {"report": {"start": "x"}}})
        );
    }
}
