use crate::differ::compare_flat_configs;
use crate::flatten::{flatten_with, DEFAULT_SEPARATOR};
use crate::parsers::parse_config;
use cfgcompare_common::{AppConfig, CfgCompareError, ComparisonResult, ConfigFormat, FlatConfig};
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

/// Engine for comparing configuration documents
pub struct ConfigDiffEngine {
    separator: String,
    ignored_keys: Vec<Regex>,
}

impl ConfigDiffEngine {
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            ignored_keys: Vec::new(),
        }
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Drop flattened keys matching any of `patterns` (regular expressions)
    /// from both sides before comparing.
    pub fn with_ignored_keys<I, S>(mut self, patterns: I) -> Result<Self, CfgCompareError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|e| {
                CfgCompareError::Config(format!("Invalid ignore pattern '{}': {}", pattern, e))
            })?;
            self.ignored_keys.push(regex);
        }
        Ok(self)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CfgCompareError> {
        Self::new()
            .with_separator(&config.separator)
            .with_ignored_keys(&config.ignore_keys)
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Parse and flatten one document, returning the format it was read as.
    pub fn flatten_contents(
        &self,
        content: &str,
        filepath: &str,
    ) -> Result<(ConfigFormat, FlatConfig), CfgCompareError> {
        let parsed = parse_config(content, filepath)?;
        let mut flat = flatten_with(&parsed.tree, "", &self.separator);

        if !self.ignored_keys.is_empty() {
            let before = flat.len();
            flat.retain(|key, _| !self.is_ignored(key));
            debug!("{}: ignored {} keys", filepath, before - flat.len());
        }

        Ok((parsed.format, flat))
    }

    /// Compare two documents held in memory.
    ///
    /// The source is parsed first; any parse failure aborts before comparing.
    pub fn compare_contents(
        &self,
        source_content: &str,
        source_filename: &str,
        target_content: &str,
        target_filename: &str,
    ) -> Result<ComparisonResult, CfgCompareError> {
        let (source_format, source_flat) = self.flatten_contents(source_content, source_filename)?;
        let (target_format, target_flat) = self.flatten_contents(target_content, target_filename)?;

        let keys = compare_flat_configs(&source_flat, &target_flat);

        Ok(ComparisonResult::from_keys(
            keys,
            (source_filename, source_format),
            (target_filename, target_format),
        ))
    }

    /// Read and compare two files from disk.
    pub fn compare_files(
        &self,
        source: &Path,
        target: &Path,
    ) -> Result<ComparisonResult, CfgCompareError> {
        let source_content = std::fs::read_to_string(source)?;
        let target_content = std::fs::read_to_string(target)?;

        info!("Comparing {} -> {}", source.display(), target.display());

        self.compare_contents(
            &source_content,
            &source.display().to_string(),
            &target_content,
            &target.display().to_string(),
        )
    }

    fn is_ignored(&self, key: &str) -> bool {
        self.ignored_keys.iter().any(|regex| regex.is_match(key))
    }
}

impl Default for ConfigDiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse, flatten and compare two documents with default options.
pub fn compare_config_files(
    source_content: &str,
    source_filename: &str,
    target_content: &str,
    target_filename: &str,
) -> Result<ComparisonResult, CfgCompareError> {
    ConfigDiffEngine::new().compare_contents(
        source_content,
        source_filename,
        target_content,
        target_filename,
    )
}
