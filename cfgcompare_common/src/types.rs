use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Serialization format of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
    Ini,
    Xml,
    Properties,
}

impl ConfigFormat {
    pub const ALL: [ConfigFormat; 6] = [
        ConfigFormat::Json,
        ConfigFormat::Yaml,
        ConfigFormat::Toml,
        ConfigFormat::Ini,
        ConfigFormat::Xml,
        ConfigFormat::Properties,
    ];

    /// Lower-case tag, e.g. `"yaml"`
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Ini => "ini",
            ConfigFormat::Xml => "xml",
            ConfigFormat::Properties => "properties",
        }
    }

    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "toml" => Some(ConfigFormat::Toml),
            "ini" => Some(ConfigFormat::Ini),
            "xml" => Some(ConfigFormat::Xml),
            "properties" => Some(ConfigFormat::Properties),
            _ => None,
        }
    }

    /// Extension fallback for a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

/// A leaf value in a parsed configuration tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Canonical stringification used for value comparison.
    ///
    /// `Null` renders as `"null"`, so it compares equal to the literal
    /// string `"null"`. Integral floats render without a fraction
    /// (`5.0` -> `"5"`), which makes `5`, `5.0` and `"5"` all equal.
    pub fn to_canonical_string(&self) -> String {
        match self {
            Scalar::Null => String::from("null"),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => format_float(*f),
            Scalar::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        if value > 0.0 {
            String::from("Infinity")
        } else {
            String::from("-Infinity")
        }
    } else if value == 0.0 {
        // Covers -0.0 as well
        String::from("0")
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// A node of a parsed configuration tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigNode {
    Scalar(Scalar),
    Sequence(Vec<ConfigNode>),
    Mapping(IndexMap<String, ConfigNode>),
}

impl ConfigNode {
    pub fn empty_mapping() -> Self {
        ConfigNode::Mapping(IndexMap::new())
    }

    pub fn null() -> Self {
        ConfigNode::Scalar(Scalar::Null)
    }

    pub fn string(value: impl Into<String>) -> Self {
        ConfigNode::Scalar(Scalar::String(value.into()))
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, ConfigNode>> {
        match self {
            ConfigNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a direct child of a mapping.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl From<Scalar> for ConfigNode {
    fn from(value: Scalar) -> Self {
        ConfigNode::Scalar(value)
    }
}

/// Flattened configuration: path string -> scalar, in traversal order
pub type FlatConfig = IndexMap<String, Scalar>;

/// A parse result together with the format it was parsed as
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConfig {
    pub tree: ConfigNode,
    pub format: ConfigFormat,
}

/// A key present on both sides whose values disagree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDifference {
    pub key: String,
    pub source_value: Scalar,
    pub target_value: Scalar,
}

/// Key-set partition and value comparison of two flattened configs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyComparison {
    /// Keys present only in the source, sorted
    pub only_in_source: Vec<String>,
    /// Keys present only in the target, sorted
    pub only_in_target: Vec<String>,
    /// Keys present in both, sorted
    pub common: Vec<String>,
    /// Common keys whose values differ, in `common` order
    pub value_differences: Vec<ValueDifference>,
}

impl KeyComparison {
    /// Common keys whose values agree
    pub fn matching_count(&self) -> usize {
        self.common.len().saturating_sub(self.value_differences.len())
    }

    pub fn is_identical(&self) -> bool {
        self.only_in_source.is_empty()
            && self.only_in_target.is_empty()
            && self.value_differences.is_empty()
    }
}

/// Full result of comparing two configuration documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub source_file: String,
    pub target_file: String,
    pub source_format: ConfigFormat,
    pub target_format: ConfigFormat,
    #[serde(flatten)]
    pub keys: KeyComparison,
}

impl ComparisonResult {
    pub fn from_keys(
        keys: KeyComparison,
        source: (&str, ConfigFormat),
        target: (&str, ConfigFormat),
    ) -> Self {
        Self {
            source_file: source.0.to_string(),
            target_file: target.0.to_string(),
            source_format: source.1,
            target_format: target.1,
            keys,
        }
    }
}
