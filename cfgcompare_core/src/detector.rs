//! Content-based format sniffing.
//!
//! Detection is an ordered cascade of heuristics; the first one that
//! matches conclusively decides the format. Filenames are never consulted
//! here, the extension fallback lives in [`crate::parsers::parse_config`].

use cfgcompare_common::ConfigFormat;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

// Per-line shape patterns
static PAT_SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\[\[?[^\[\]\r\n]+\]\]?[ \t]*(?:[#;][^\r\n]*)?\r?$").unwrap()
});
static PAT_KEY_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[\w.\-]+[ \t]*=").unwrap());
static PAT_YAML_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[\w\-]+[ \t]*:").unwrap());

/// Guess the format of `content`, or `None` if no heuristic matches.
pub fn detect_format(content: &str) -> Option<ConfigFormat> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }

    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        trace!("detected json: parses as JSON");
        return Some(ConfigFormat::Json);
    }

    if trimmed.starts_with('<') || has_xml_declaration(content) {
        trace!("detected xml: markup prefix or declaration");
        return Some(ConfigFormat::Xml);
    }

    let has_section_header = PAT_SECTION_HEADER.is_match(content);
    let has_key_assignment = PAT_KEY_ASSIGNMENT.is_match(content);

    if has_section_header && has_key_assignment {
        // TOML accepts most sectioned INI files, so a strict TOML parse is the
        // tie breaker. A failed parse only means "not TOML".
        return if toml::from_str::<toml::Table>(content).is_ok() {
            trace!("detected toml: sections and assignments, valid TOML");
            Some(ConfigFormat::Toml)
        } else {
            trace!("detected ini: sections and assignments, rejected by TOML");
            Some(ConfigFormat::Ini)
        };
    }

    if has_key_assignment {
        trace!("detected properties: assignments without sections");
        return Some(ConfigFormat::Properties);
    }

    if PAT_YAML_KEY.is_match(content) {
        trace!("detected yaml: key/colon lines");
        return Some(ConfigFormat::Yaml);
    }

    trace!("no format detected");
    None
}

fn has_xml_declaration(content: &str) -> bool {
    content.to_ascii_lowercase().contains("<?xml")
}
