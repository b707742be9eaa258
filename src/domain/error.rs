//! Error types for the collaborators around the core.
//!
//! The indicator and simulation code is total and never returns these.

#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read price data from {source_name}: {reason}")]
    DataRead { source_name: String, reason: String },

    #[error("no usable price rows for {symbol}")]
    NoData { symbol: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) | TraderError::Report { .. } => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. } => 2,
            TraderError::DataRead { .. } | TraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config_invalid() {
        let err = TraderError::ConfigInvalid {
            section: "strategy".into(),
            key: "ma_period".into(),
            reason: "must be a positive integer".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [strategy] ma_period: must be a positive integer"
        );
    }

    #[test]
    fn display_no_data() {
        let err = TraderError::NoData {
            symbol: "AAPL".into(),
        };
        assert_eq!(err.to_string(), "no usable price rows for AAPL");
    }

    #[test]
    fn io_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TraderError = io.into();
        assert!(matches!(err, TraderError::Io(_)));
    }
}
