use super::FormatParser;
use cfgcompare_common::{CfgCompareError, ConfigFormat, ConfigNode, Scalar};
use indexmap::IndexMap;

/// Line-oriented `key=value` files.
///
/// Keys are kept verbatim (dots are not expanded into nesting) and values
/// are always strings.
pub struct PropertiesParser;

impl FormatParser for PropertiesParser {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Properties
    }

    fn parse(&self, content: &str) -> Result<ConfigNode, CfgCompareError> {
        Ok(parse_properties(content))
    }
}

pub fn parse_properties(content: &str) -> ConfigNode {
    let mut entries = IndexMap::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        // Only the first '=' delimits; later ones belong to the value
        if let Some((key, value)) = line.split_once('=') {
            entries.insert(
                key.trim().to_string(),
                ConfigNode::Scalar(Scalar::String(value.trim().to_string())),
            );
        }
    }

    ConfigNode::Mapping(entries)
}
