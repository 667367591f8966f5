use crate::ConfigFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfgCompareError {
    #[error("Unable to detect configuration format for {path}")]
    FormatUndetected { path: String },

    #[error("Failed to parse {format} content: {message}")]
    Parse {
        format: ConfigFormat,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CfgCompareError {
    pub fn parse(format: ConfigFormat, err: impl std::fmt::Display) -> Self {
        CfgCompareError::Parse {
            format,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_undetected_names_path() {
        let err = CfgCompareError::FormatUndetected {
            path: "x.unknownext".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to detect configuration format for x.unknownext"
        );
    }

    #[test]
    fn test_parse_error_names_format() {
        let err = CfgCompareError::parse(ConfigFormat::Toml, "expected `=`");
        assert_eq!(err.to_string(), "Failed to parse TOML content: expected `=`");
        assert!(matches!(
            err,
            CfgCompareError::Parse {
                format: ConfigFormat::Toml,
                ..
            }
        ));
    }
}
