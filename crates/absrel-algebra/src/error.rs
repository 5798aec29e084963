//! Error types for the algebra.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    #[error("Invalid alpha index '{index}': allowed values are the configured basis labels")]
    InvalidIndex { index: String },
    #[error("Invalid allowed list: {reason}")]
    InvalidAllowed { reason: String },
    #[error("Invalid metric '{value}': expected four +/- signs, e.g. \"+---\"")]
    InvalidMetric { value: String },
    #[error("Invalid division convention '{value}': expected \"by\" or \"into\"")]
    InvalidDivision { value: String },
    #[error("Product is undefined for group label '{index}': only the 16 basis labels multiply")]
    UndefinedProduct { index: String },
    #[error("Invalid term input '{input}': {reason}")]
    InvalidTerm { input: String, reason: String },
    #[error("Values built from different configurations cannot be combined")]
    ConfigMismatch,
}
