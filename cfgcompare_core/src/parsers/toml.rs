use super::FormatParser;
use cfgcompare_common::{CfgCompareError, ConfigFormat, ConfigNode, Scalar};
use ::toml::{Table, Value as TomlValue};

/// Strict TOML via the `toml` crate
pub struct TomlParser;

impl FormatParser for TomlParser {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Toml
    }

    fn parse(&self, content: &str) -> Result<ConfigNode, CfgCompareError> {
        let table: Table =
            ::toml::from_str(content).map_err(|e| CfgCompareError::parse(ConfigFormat::Toml, e))?;
        Ok(table_to_node(table))
    }
}

fn table_to_node(table: Table) -> ConfigNode {
    ConfigNode::Mapping(
        table
            .into_iter()
            .map(|(key, val)| (key, toml_to_node(val)))
            .collect(),
    )
}

fn toml_to_node(value: TomlValue) -> ConfigNode {
    match value {
        TomlValue::String(s) => ConfigNode::Scalar(Scalar::String(s)),
        TomlValue::Integer(i) => ConfigNode::Scalar(Scalar::Integer(i)),
        TomlValue::Float(f) => ConfigNode::Scalar(Scalar::Float(f)),
        TomlValue::Boolean(b) => ConfigNode::Scalar(Scalar::Bool(b)),
        TomlValue::Datetime(dt) => ConfigNode::Scalar(Scalar::String(dt.to_string())),
        TomlValue::Array(arr) => ConfigNode::Sequence(arr.into_iter().map(toml_to_node).collect()),
        TomlValue::Table(table) => table_to_node(table),
    }
}
