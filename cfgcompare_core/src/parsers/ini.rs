use super::FormatParser;
use cfgcompare_common::{CfgCompareError, ConfigFormat, ConfigNode, Scalar};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static PAT_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]*)\]\s*(?:[;#].*)?$").unwrap());

/// Permissive INI reader.
///
/// Accepts anything: unrecognised lines are treated as bare keys, which
/// become `true`. Section names containing dots (`[a.b]`) nest, and
/// `key[] = value` lines accumulate into a sequence.
pub struct IniParser;

impl FormatParser for IniParser {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Ini
    }

    fn parse(&self, content: &str) -> Result<ConfigNode, CfgCompareError> {
        Ok(parse_ini(content))
    }
}

pub fn parse_ini(content: &str) -> ConfigNode {
    let mut root: IndexMap<String, ConfigNode> = IndexMap::new();
    let mut section: Vec<String> = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = PAT_SECTION.captures(line) {
            section = caps[1]
                .split('.')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();
            section_map(&mut root, &section);
            continue;
        }

        let (raw_key, raw_value) = match line.split_once('=') {
            Some((key, value)) => (key.trim(), Some(value.trim())),
            None => (line, None),
        };
        if raw_key.is_empty() {
            continue;
        }

        let value = raw_value.map(parse_value).unwrap_or(Scalar::Bool(true));
        let target = section_map(&mut root, &section);

        if let Some(list_key) = raw_key.strip_suffix("[]") {
            let key = unquote(list_key.trim()).unwrap_or_else(|| list_key.trim().to_string());
            let entry = target
                .entry(key)
                .or_insert_with(|| ConfigNode::Sequence(Vec::new()));
            match entry {
                ConfigNode::Sequence(items) => items.push(ConfigNode::Scalar(value)),
                other => *other = ConfigNode::Sequence(vec![ConfigNode::Scalar(value)]),
            }
        } else {
            let key = unquote(raw_key).unwrap_or_else(|| raw_key.to_string());
            target.insert(key, ConfigNode::Scalar(value));
        }
    }

    ConfigNode::Mapping(root)
}

/// Walk (creating as needed) the nested mapping for a section path.
fn section_map<'a>(
    root: &'a mut IndexMap<String, ConfigNode>,
    path: &[String],
) -> &'a mut IndexMap<String, ConfigNode> {
    let mut current = root;
    for part in path {
        let entry = current
            .entry(part.clone())
            .or_insert_with(ConfigNode::empty_mapping);
        if !matches!(entry, ConfigNode::Mapping(_)) {
            *entry = ConfigNode::empty_mapping();
        }
        current = match entry {
            ConfigNode::Mapping(map) => map,
            _ => unreachable!(),
        };
    }
    current
}

fn parse_value(raw: &str) -> Scalar {
    if let Some(inner) = quoted_value(raw) {
        return Scalar::String(inner);
    }

    match strip_inline_comment(raw) {
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        "null" => Scalar::Null,
        other => Scalar::String(other.to_string()),
    }
}

fn unquote(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        Some(raw[1..raw.len() - 1].to_string())
    } else {
        None
    }
}

/// A quoted value, optionally followed by an inline comment.
fn quoted_value(raw: &str) -> Option<String> {
    let quote = raw.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let close = raw[1..].find(quote)? + 1;
    let rest = raw[close + 1..].trim_start();
    if rest.is_empty() || rest.starts_with(';') || rest.starts_with('#') {
        Some(raw[1..close].to_string())
    } else {
        None
    }
}

/// Drop a trailing `; comment` or `# comment`; the marker must follow whitespace.
fn strip_inline_comment(value: &str) -> &str {
    let mut prev_ws = false;
    for (idx, ch) in value.char_indices() {
        if (ch == ';' || ch == '#') && prev_ws {
            return value[..idx].trim_end();
        }
        prev_ws = ch.is_whitespace();
    }
    value
}
