use cfgcompare_common::ComparisonResult;

pub const SUMMARY_TITLE: &str = "Configuration Comparison Summary";

/// Render the fixed plain-text report for a comparison.
pub fn generate_summary(result: &ComparisonResult) -> String {
    let mut lines = Vec::with_capacity(9);
    lines.push(SUMMARY_TITLE.to_string());
    lines.push("=".repeat(SUMMARY_TITLE.len()));
    lines.push(format!(
        "Source: {} ({})",
        result.source_file, result.source_format
    ));
    lines.push(format!(
        "Target: {} ({})",
        result.target_file, result.target_format
    ));
    lines.push(String::new());
    lines.push(format!("Only in source:   {}", result.keys.only_in_source.len()));
    lines.push(format!("Only in target:   {}", result.keys.only_in_target.len()));
    lines.push(format!("Different values: {}", result.keys.value_differences.len()));
    lines.push(format!("Matching:         {}", result.keys.matching_count()));
    lines.join("\n")
}
