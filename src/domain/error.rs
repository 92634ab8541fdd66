//! Domain error types.

/// Top-level error type for goldcast.
#[derive(Debug, thiserror::Error)]
pub enum GoldcastError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidInput {
        parameter: String,
        value: i64,
        reason: String,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("live feed error: {reason}")]
    Feed { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GoldcastError {
    pub fn invalid_days(value: i64, reason: &str) -> Self {
        GoldcastError::InvalidInput {
            parameter: "days".to_string(),
            value,
            reason: reason.to_string(),
        }
    }
}

impl From<&GoldcastError> for std::process::ExitCode {
    fn from(err: &GoldcastError) -> Self {
        let code: u8 = match err {
            GoldcastError::Io(_) => 1,
            GoldcastError::ConfigParse { .. } | GoldcastError::ConfigInvalid { .. } => 2,
            GoldcastError::InvalidInput { .. } => 3,
            GoldcastError::Csv(_) | GoldcastError::Json(_) => 4,
            GoldcastError::Feed { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
