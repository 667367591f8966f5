use super::FormatParser;
use cfgcompare_common::{CfgCompareError, ConfigFormat, ConfigNode, Scalar};
use serde_json::Value as JsonValue;

/// Strict JSON via `serde_json`
pub struct JsonParser;

impl FormatParser for JsonParser {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Json
    }

    fn parse(&self, content: &str) -> Result<ConfigNode, CfgCompareError> {
        let value: JsonValue = serde_json::from_str(content)
            .map_err(|e| CfgCompareError::parse(ConfigFormat::Json, e))?;
        Ok(json_to_node(value))
    }
}

/// Convert a JSON value into a config tree
pub fn json_to_node(value: JsonValue) -> ConfigNode {
    match value {
        JsonValue::Null => ConfigNode::null(),
        JsonValue::Bool(b) => ConfigNode::Scalar(Scalar::Bool(b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                ConfigNode::Scalar(Scalar::Integer(i))
            } else {
                ConfigNode::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        JsonValue::String(s) => ConfigNode::Scalar(Scalar::String(s)),
        JsonValue::Array(arr) => ConfigNode::Sequence(arr.into_iter().map(json_to_node).collect()),
        JsonValue::Object(map) => ConfigNode::Mapping(
            map.into_iter()
                .map(|(key, val)| (key, json_to_node(val)))
                .collect(),
        ),
    }
}
