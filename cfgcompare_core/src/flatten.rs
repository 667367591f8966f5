use cfgcompare_common::{ConfigNode, FlatConfig};

pub const DEFAULT_SEPARATOR: &str = ".";

/// Flatten a tree into dotted/bracketed paths with the default separator.
///
/// `{"a": {"b": [1, 2]}}` becomes `a.b[0] = 1`, `a.b[1] = 2`.
pub fn flatten_config(node: &ConfigNode) -> FlatConfig {
    flatten_with(node, "", DEFAULT_SEPARATOR)
}

/// Flatten under `prefix`, joining mapping keys with `separator`.
///
/// Scalars at an empty prefix produce nothing, as do empty containers.
pub fn flatten_with(node: &ConfigNode, prefix: &str, separator: &str) -> FlatConfig {
    let mut output = FlatConfig::new();
    flatten_into(node, prefix, separator, &mut output);
    output
}

fn flatten_into(node: &ConfigNode, prefix: &str, separator: &str, output: &mut FlatConfig) {
    match node {
        ConfigNode::Scalar(scalar) => {
            if !prefix.is_empty() {
                output.insert(prefix.to_string(), scalar.clone());
            }
        }
        ConfigNode::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                let path = format!("{}[{}]", prefix, i);
                flatten_into(item, &path, separator, output);
            }
        }
        ConfigNode::Mapping(map) => {
            for (key, value) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}{}{}", prefix, separator, key)
                };
                match value {
                    ConfigNode::Scalar(scalar) => {
                        output.insert(path, scalar.clone());
                    }
                    _ => flatten_into(value, &path, separator, output),
                }
            }
        }
    }
}
