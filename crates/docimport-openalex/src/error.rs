//! Error types for mapping staged works
//!
//! Classification and conversion failures are fatal for the record being
//! mapped only; the import loop logs them and moves on.

use std::fmt;

/// Which source vocabulary a type code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeField {
    /// Work type (`type`)
    Document,
    /// Venue type (`primary_location.source.type`)
    Source,
}

impl fmt::Display for TypeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => f.write_str("document type"),
            Self::Source => f.write_str("source type"),
        }
    }
}

/// Type code without a docserver counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    UnsupportedType { field: TypeField, code: String },
    MissingType { field: TypeField },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType { field, code } => {
                write!(f, "{field} '{code}' has no docserver counterpart")
            }
            Self::MissingType { field } => write!(f, "{field} is missing"),
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Failure building a field of the target document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Required field or nested object absent
    MissingField(&'static str),
    /// Publication date not in `YYYY-MM-DD` form or not a calendar date
    InvalidDate { value: String, reason: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing {field}"),
            Self::InvalidDate { value, reason } => {
                write!(f, "invalid publication date '{value}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConversionError {}

/// Any reason a work could not be mapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    Classify(ClassifyError),
    Conversion(ConversionError),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classify(e) => write!(f, "{e}"),
            Self::Conversion(e) => write!(f, "conversion: {e}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Classify(e) => Some(e),
            Self::Conversion(e) => Some(e),
        }
    }
}

impl From<ClassifyError> for MapError {
    fn from(e: ClassifyError) -> Self {
        Self::Classify(e)
    }
}

impl From<ConversionError> for MapError {
    fn from(e: ConversionError) -> Self {
        Self::Conversion(e)
    }
}
