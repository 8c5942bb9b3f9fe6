//! Error taxonomy shared by the Shadow Hours crates.
//!
//! Malformed calendar lines and unknown descriptions are not errors: they are
//! ignored or reported as UNMAPPED. Only structurally required inputs fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShadowError {
    /// Required text input was missing or blank.
    #[error("input text is empty")]
    InputEmpty,

    /// A date header could not be turned into a calendar date at export time.
    #[error("cannot parse date '{date}': {reason}")]
    DateParse { date: String, reason: String },

    /// The reference table could not be read, or had no usable rows.
    #[error("cannot load reference table {path}: {reason}")]
    ReferenceLoad { path: String, reason: String },

    /// Appending a learned record to the backing store failed.
    #[error("cannot append to reference table {path}: {reason}")]
    ReferenceWrite { path: String, reason: String },

    /// The injected resolver failed while resolving an unmapped entry.
    #[error("resolver failed for '{description}': {reason}")]
    Resolver { description: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ShadowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = ShadowError::DateParse {
            date: "12 Foo, 2024".to_string(),
            reason: "unknown month 'Foo'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot parse date '12 Foo, 2024': unknown month 'Foo'"
        );
        assert_eq!(ShadowError::InputEmpty.to_string(), "input text is empty");
    }
}
