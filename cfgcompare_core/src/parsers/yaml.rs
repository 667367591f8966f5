use super::FormatParser;
use cfgcompare_common::{CfgCompareError, ConfigFormat, ConfigNode, Scalar};
use serde_yml::Value as YamlValue;

/// YAML via `serde_yml`; an empty document becomes an empty mapping
pub struct YamlParser;

impl FormatParser for YamlParser {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Yaml
    }

    fn parse(&self, content: &str) -> Result<ConfigNode, CfgCompareError> {
        if content.trim().is_empty() {
            return Ok(ConfigNode::empty_mapping());
        }

        let value: YamlValue = serde_yml::from_str(content)
            .map_err(|e| CfgCompareError::parse(ConfigFormat::Yaml, e))?;

        Ok(match yaml_to_node(value) {
            ConfigNode::Scalar(Scalar::Null) => ConfigNode::empty_mapping(),
            node => node,
        })
    }
}

/// Convert a YAML value into a config tree
fn yaml_to_node(yaml: YamlValue) -> ConfigNode {
    match yaml {
        YamlValue::Null => ConfigNode::null(),
        YamlValue::Bool(b) => ConfigNode::Scalar(Scalar::Bool(b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                ConfigNode::Scalar(Scalar::Integer(i))
            } else if let Some(f) = n.as_f64() {
                ConfigNode::Scalar(Scalar::Float(f))
            } else {
                ConfigNode::null()
            }
        }
        YamlValue::String(s) => ConfigNode::Scalar(Scalar::String(s)),
        YamlValue::Sequence(seq) => ConfigNode::Sequence(seq.into_iter().map(yaml_to_node).collect()),
        YamlValue::Mapping(map) => ConfigNode::Mapping(
            map.into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_node(v)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_node(tagged.value),
    }
}

fn yaml_key(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        // Non-string keys (`1: a`, `true: b`) use the scalar rendering,
        // sequence and mapping keys their compact JSON form
        other => match yaml_to_node(other) {
            ConfigNode::Scalar(scalar) => scalar.to_canonical_string(),
            complex => serde_json::to_string(&complex).unwrap_or_default(),
        },
    }
}
