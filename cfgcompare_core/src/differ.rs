use cfgcompare_common::{FlatConfig, KeyComparison, ValueDifference};
use tracing::debug;

/// Partition the keys of two flattened configs and compare shared values.
///
/// All three key lists are sorted by plain string order, so `a[10]` sorts
/// before `a[2]`. Values are compared by their canonical string form, which
/// makes `5432` and `"5432"` equal; differences keep the original scalars.
pub fn compare_flat_configs(source: &FlatConfig, target: &FlatConfig) -> KeyComparison {
    let mut only_in_source: Vec<String> = source
        .keys()
        .filter(|key| !target.contains_key(key.as_str()))
        .cloned()
        .collect();
    let mut only_in_target: Vec<String> = target
        .keys()
        .filter(|key| !source.contains_key(key.as_str()))
        .cloned()
        .collect();
    let mut common: Vec<String> = source
        .keys()
        .filter(|key| target.contains_key(key.as_str()))
        .cloned()
        .collect();

    only_in_source.sort();
    only_in_target.sort();
    common.sort();

    let value_differences: Vec<ValueDifference> = common
        .iter()
        .filter_map(|key| {
            let source_value = &source[key.as_str()];
            let target_value = &target[key.as_str()];
            if source_value.to_canonical_string() == target_value.to_canonical_string() {
                None
            } else {
                Some(ValueDifference {
                    key: key.clone(),
                    source_value: source_value.clone(),
                    target_value: target_value.clone(),
                })
            }
        })
        .collect();

    debug!(
        "compared {} source keys with {} target keys: {} only in source, {} only in target, {} common, {} different",
        source.len(),
        target.len(),
        only_in_source.len(),
        only_in_target.len(),
        common.len(),
        value_differences.len()
    );

    KeyComparison {
        only_in_source,
        only_in_target,
        common,
        value_differences,
    }
}
