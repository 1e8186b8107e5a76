use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

pub type ClarityResult<T> = Result<T, ClarityError>;

/// Reasons a campaign draft is refused at save time. The draft itself is
/// left untouched so the operator can correct it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingRequiredFields { fields: Vec<&'static str> },

    #[error("no content selected")]
    NoContentSelected,

    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

impl ValidationError {
    /// Stable machine-readable code, used as the `error` field of API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredFields { .. } => "missing_required_fields",
            ValidationError::NoContentSelected => "no_content_selected",
            ValidationError::InvalidDateRange { .. } => "invalid_date_range",
        }
    }

    /// Operator-facing notice text (zh-CN).
    pub fn notice(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredFields { .. } => "请填写所有必填字段",
            ValidationError::NoContentSelected => "请至少添加一个AID",
            ValidationError::InvalidDateRange { .. } => "活动结束时间不能早于开始时间",
        }
    }
}

/// A string did not name any value of a closed vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum ClarityError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Campaign not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid transition: cannot {action} from {from}")]
    InvalidTransition { action: String, from: String },

    #[error("Feature disabled: {0}")]
    FeatureDisabled(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_fields() {
        let err = ValidationError::MissingRequiredFields {
            fields: vec!["name", "start_date"],
        };
        assert_eq!(err.to_string(), "missing required fields: name, start_date");
        assert_eq!(err.code(), "missing_required_fields");
        assert_eq!(err.notice(), "请填写所有必填字段");
    }

    #[test]
    fn test_validation_converts_into_clarity_error() {
        let err: ClarityError = ValidationError::NoContentSelected.into();
        assert!(matches!(err, ClarityError::Validation(ValidationError::NoContentSelected)));
        assert_eq!(err.to_string(), "Validation failed: no content selected");
    }

    #[test]
    fn test_config_error_converts_into_clarity_error() {
        let err: ClarityError = config::ConfigError::Message("bad port".into()).into();
        assert!(matches!(err, ClarityError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: bad port");
    }
}
