pub mod detector;
pub mod differ;
pub mod engine;
pub mod flatten;
pub mod parsers;
pub mod summary;

pub use detector::detect_format;
pub use differ::compare_flat_configs;
pub use engine::{compare_config_files, ConfigDiffEngine};
pub use flatten::{flatten_config, flatten_with, DEFAULT_SEPARATOR};
pub use parsers::{parse_config, parser_for, resolve_format, FormatParser};
pub use summary::generate_summary;
