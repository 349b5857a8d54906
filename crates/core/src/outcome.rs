//! Uniform success/failure envelope returned across the HTTP boundary.
//!
//! Services return plain `Result`s; the envelope is what the boundary renders so
//! every endpoint answers with the same shape:
//!
//! ```json
//! { "success": true,  "data": { ... }, "error": null }
//! { "success": false, "data": null,    "error": "Product ID cannot be empty." }
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Success without a payload (e.g. deletion).
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T>
where
    E: core::fmt::Display,
{
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn success_carries_data_and_no_error() {
        let o = Outcome::success(5);
        assert!(o.is_success());
        assert_eq!(o.data, Some(5));
        assert_eq!(o.error, None);
    }

    #[test]
    fn failure_from_result_uses_display_message() {
        let r: Result<u8, ValidationError> = Err(ValidationError::EmptyInput);
        let o = Outcome::from(r);
        assert!(!o.is_success());
        assert_eq!(o.data, None);
        assert_eq!(o.error.as_deref(), Some("Product ID cannot be empty."));
    }

    #[test]
    fn json_shape_is_stable() {
        let o: Outcome<u8> = Outcome::failure("boom");
        assert_eq!(
            serde_json::to_value(&o).unwrap(),
            serde_json::json!({"success": false, "data": null, "error": "boom"})
        );

        let done: Outcome<u8> = Outcome::done();
        assert_eq!(
            serde_json::to_value(&done).unwrap(),
            serde_json::json!({"success": true, "data": null, "error": null})
        );
    }
}
