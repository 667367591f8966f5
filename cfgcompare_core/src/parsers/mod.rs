pub mod ini;
pub mod json;
pub mod properties;
pub mod toml;
pub mod xml;
pub mod yaml;

use crate::detector::detect_format;
use cfgcompare_common::{CfgCompareError, ConfigFormat, ConfigNode, ParsedConfig};
use std::path::Path;
use tracing::debug;

/// Adapter from one serialization grammar to a [`ConfigNode`] tree.
pub trait FormatParser {
    fn format(&self) -> ConfigFormat;

    fn parse(&self, content: &str) -> Result<ConfigNode, CfgCompareError>;
}

/// Parser registered for `format`.
pub fn parser_for(format: ConfigFormat) -> &'static dyn FormatParser {
    match format {
        ConfigFormat::Json => &json::JsonParser,
        ConfigFormat::Yaml => &yaml::YamlParser,
        ConfigFormat::Toml => &toml::TomlParser,
        ConfigFormat::Ini => &ini::IniParser,
        ConfigFormat::Xml => &xml::XmlParser,
        ConfigFormat::Properties => &properties::PropertiesParser,
    }
}

/// Resolve the format of a document, content first, then by extension.
pub fn resolve_format(content: &str, filepath: &str) -> Result<ConfigFormat, CfgCompareError> {
    if let Some(format) = detect_format(content) {
        debug!("{}: detected {} from content", filepath, format);
        return Ok(format);
    }

    match ConfigFormat::from_path(Path::new(filepath)) {
        Some(format) => {
            debug!("{}: falling back to {} from extension", filepath, format);
            Ok(format)
        }
        None => Err(CfgCompareError::FormatUndetected {
            path: filepath.to_string(),
        }),
    }
}

/// Detect the format of `content` and parse it into a tree.
///
/// `filepath` is only used for the extension fallback and error context.
pub fn parse_config(content: &str, filepath: &str) -> Result<ParsedConfig, CfgCompareError> {
    let format = resolve_format(content, filepath)?;
    let tree = parser_for(format).parse(content)?;
    Ok(ParsedConfig { tree, format })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_registry_matches_format() {
        for format in ConfigFormat::ALL {
            assert_eq!(parser_for(format).format(), format);
        }
    }

    #[test]
    fn test_parse_config_detects_from_content() {
        let parsed = parse_config(r#"{"a": {"b": 1}}"#, "settings.txt").unwrap();
        assert_eq!(parsed.format, ConfigFormat::Json);
        assert!(parsed.tree.get("a").is_some());
    }

    #[test]
    fn test_parse_config_falls_back_to_extension() {
        // A bare comment is not detectable but parses as an empty INI file
        let parsed = parse_config("; nothing here\n", "empty.ini").unwrap();
        assert_eq!(parsed.format, ConfigFormat::Ini);
        assert_eq!(parsed.tree, ConfigNode::empty_mapping());
    }

    #[test]
    fn test_parse_config_empty_yaml_by_extension() {
        let parsed = parse_config("", "values.yml").unwrap();
        assert_eq!(parsed.format, ConfigFormat::Yaml);
        assert_eq!(parsed.tree, ConfigNode::empty_mapping());
    }

    #[test]
    fn test_parse_config_format_undetected() {
        let err = parse_config("not json and not anything else @#$", "x.unknownext").unwrap_err();
        match err {
            CfgCompareError::FormatUndetected { path } => assert_eq!(path, "x.unknownext"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_content_wins_over_extension() {
        let parsed = parse_config("name: demo\n", "actually.json").unwrap();
        assert_eq!(parsed.format, ConfigFormat::Yaml);
    }

    #[test]
    fn test_parse_error_tagged_with_format() {
        // Undetectable content routed to the strict JSON parser by extension
        let err = parse_config("not json at all", "broken.json").unwrap_err();
        assert!(matches!(
            err,
            CfgCompareError::Parse {
                format: ConfigFormat::Json,
                ..
            }
        ));
    }
}
