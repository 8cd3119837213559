//! Output mode control.
//!
//! [`OutputMode`] picks between the hand-formatted text a front end prints for
//! people and the structured formats it prints for other programs.

use clap::ValueEnum;

/// Controls how listings and reports are rendered.
///
/// This is the user-facing enum for an `--output` CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Human-readable text (formatted by the caller)
    #[default]
    Text,
    /// Serialize data as JSON
    Json,
    /// Serialize data as YAML
    Yaml,
    /// Serialize data as XML
    Xml,
    /// Serialize flattened data as CSV
    Csv,
}

impl OutputMode {
    /// Returns true if this is a structured output mode (JSON, YAML, XML, CSV).
    pub fn is_structured(&self) -> bool {
        !matches!(self, OutputMode::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_default_is_text() {
        assert_eq!(OutputMode::default(), OutputMode::Text);
    }

    #[test]
    fn test_output_mode_is_structured() {
        assert!(OutputMode::Json.is_structured());
        assert!(OutputMode::Yaml.is_structured());
        assert!(OutputMode::Xml.is_structured());
        assert!(OutputMode::Csv.is_structured());
        assert!(!OutputMode::Text.is_structured());
    }

    #[test]
    fn test_value_enum_names() {
        assert_eq!(OutputMode::from_str("json", true), Ok(OutputMode::Json));
        assert_eq!(OutputMode::from_str("CSV", true), Ok(OutputMode::Csv));
        assert!(OutputMode::from_str("html", true).is_err());
    }
}
