pub mod candidate;
pub mod job;
pub mod resume;

use crate::errors::AppError;

/// Rejects a create request when any required field is absent.
/// `fields` pairs each field name with whether it was supplied.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_lists_every_missing_field_in_order() {
        let err = require_fields(&[("title", false), ("company", true), ("skills", false)])
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Missing fields: title, skills"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_require_fields_passes_when_all_present() {
        assert!(require_fields(&[("name", true), ("email", true)]).is_ok());
    }
}
