//! Error types for property bags and typed assembly runs.
//!
//! Step failures are never wrapped by [`SyncAssembly::run`](crate::assemble::SyncAssembly::run)
//! or [`Assembly::run`](crate::assemble::Assembly): the step's own error type
//! is returned as is. The types here only cover conversions between
//! [`Props`](crate::props::Props) and JSON values or user-defined types.

use thiserror::Error;

/// Represents errors that can occur when converting to or from [`Props`](crate::props::Props).
///
/// # Examples
///
/// ```rust
/// use assembly::error::PropsError;
/// use assembly::props::Props;
///
/// let error = Props::try_from(serde_json::json!(5)).unwrap_err();
/// assert_eq!(error, PropsError::NotAnObject { found: "number" });
/// assert_eq!(format!("{error}"), "expected a JSON object, found number");
/// ```
#[derive(Debug, Error)]
pub enum PropsError {
    /// The value is not a JSON object and cannot be used as a property bag.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// The JSON kind that was found instead (`"null"`, `"number"`, ...).
        found: &'static str,
    },

    /// A property is present but cannot be decoded into the requested type.
    #[error("property `{key}` has an unexpected shape: {source}")]
    InvalidProperty {
        /// The key of the offending property.
        key: String,
        /// The underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized to, or deserialized from, a property bag.
    #[error("property bag conversion failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PartialEq for PropsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotAnObject { found: left }, Self::NotAnObject { found: right }) => {
                left == right
            }
            (
                Self::InvalidProperty { key: left, .. },
                Self::InvalidProperty { key: right, .. },
            ) => left == right,
            (Self::Serialization(left), Self::Serialization(right)) => {
                left.to_string() == right.to_string()
            }
            _ => false,
        }
    }
}

/// Represents errors produced by a typed assembly run.
///
/// A typed run converts its input into a property bag, runs every step, and
/// decodes the final bag into the requested output type. Either a step or one
/// of the two conversions can fail.
#[derive(Debug, Error)]
pub enum TypedRunError<E> {
    /// A step failed. The step's error is carried unchanged.
    #[error("assembly step failed: {0}")]
    Step(E),

    /// The input could not be encoded, or the final bag could not be decoded.
    #[error(transparent)]
    Props(#[from] PropsError),
}

impl<E> TypedRunError<E> {
    /// Returns the step error, if the run failed inside a step.
    pub fn into_step_error(self) -> Option<E> {
        match self {
            Self::Step(error) => Some(error),
            Self::Props(_) => None,
        }
    }
}

/// Returns the JSON kind name of a value, as used in [`PropsError::NotAnObject`].
pub(crate) const fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(serde_json::json!(null), "null")]
    #[case(serde_json::json!(true), "boolean")]
    #[case(serde_json::json!(1.5), "number")]
    #[case(serde_json::json!("text"), "string")]
    #[case(serde_json::json!([1, 2]), "array")]
    #[case(serde_json::json!({}), "object")]
    fn test_kind_of(#[case] value: serde_json::Value, #[case] expected: &str) {
        assert_eq!(kind_of(&value), expected);
    }

    #[rstest]
    fn test_invalid_property_display_names_key() {
        let source = serde_json::from_value::<u8>(serde_json::json!("x")).unwrap_err();
        let error = PropsError::InvalidProperty {
            key: "count".to_string(),
            source,
        };
        assert!(format!("{error}").starts_with("property `count` has an unexpected shape"));
    }

    #[rstest]
    fn test_typed_run_error_keeps_step_error() {
        let error: TypedRunError<&str> = TypedRunError::Step("boom");
        assert_eq!(format!("{error}"), "assembly step failed: boom");
        assert_eq!(error.into_step_error(), Some("boom"));
    }

    #[rstest]
    fn test_typed_run_error_from_props_error() {
        let error: TypedRunError<&str> = PropsError::NotAnObject { found: "array" }.into();
        assert_eq!(format!("{error}"), "expected a JSON object, found array");
        assert!(error.into_step_error().is_none());
    }
}
