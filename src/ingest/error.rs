// src/ingest/error.rs
use thiserror::Error;

/// Why a required field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required key absent after alias resolution.
    MissingField,
    /// Present but blank after trimming.
    EmptyField,
    /// Present but fails a structural pattern check.
    InvalidFormat,
    /// Present with the wrong underlying JSON type.
    InvalidType,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingField => "missing_field",
            ErrorKind::EmptyField => "empty_field",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::InvalidType => "invalid_type",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::MissingField => write!(f, "missing field"),
            ErrorKind::EmptyField => write!(f, "empty field"),
            ErrorKind::InvalidFormat => write!(f, "invalid format"),
            ErrorKind::InvalidType => write!(f, "invalid type"),
        }
    }
}

/// First failing rule of a record, named by canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind}: {field}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub field: &'static str,
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            kind: ErrorKind::MissingField,
            field,
        }
    }

    pub fn empty(field: &'static str) -> Self {
        Self {
            kind: ErrorKind::EmptyField,
            field,
        }
    }

    pub fn format(field: &'static str) -> Self {
        Self {
            kind: ErrorKind::InvalidFormat,
            field,
        }
    }

    pub fn invalid_type(field: &'static str) -> Self {
        Self {
            kind: ErrorKind::InvalidType,
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_kind_and_field() {
        assert_eq!(
            ValidationError::missing("body").to_string(),
            "missing field: body"
        );
        assert_eq!(
            ValidationError::format("lang_code").to_string(),
            "invalid format: lang_code"
        );
        assert_eq!(ErrorKind::InvalidType.as_str(), "invalid_type");
    }
}
