//! Reserved namespace guard.

use crate::error::{SchemaError, SchemaResult};

/// Prefix of projections owned by the framework itself.
pub const RESERVED_PREFIX: &str = "Fraym";

/// Rejects qualified names that would shadow framework-owned projections.
#[derive(Debug, Clone)]
pub struct NameValidator {
    reserved_prefix: String,
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new(RESERVED_PREFIX)
    }
}

impl NameValidator {
    pub fn new(reserved_prefix: impl Into<String>) -> Self {
        Self {
            reserved_prefix: reserved_prefix.into(),
        }
    }

    #[must_use]
    pub fn reserved_prefix(&self) -> &str {
        &self.reserved_prefix
    }

    /// Returns true if the name is owned by the framework.
    #[must_use]
    #[inline]
    pub fn is_reserved(&self, name: &str) -> bool {
        name.starts_with(&self.reserved_prefix)
    }

    /// Fails with [`SchemaError::ReservedNamespace`] for reserved names.
    pub fn validate(&self, qualified_name: &str) -> SchemaResult<()> {
        if self.is_reserved(qualified_name) {
            return Err(SchemaError::ReservedNamespace {
                name: qualified_name.to_string(),
                prefix: self.reserved_prefix.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_regular_names() {
        let validator = NameValidator::default();
        for name in ["Order", "LineItem", "fraymLower", "MyFraym", "Fray"] {
            assert!(validator.validate(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_rejects_reserved_prefix() {
        let validator = NameValidator::default();
        for name in ["Fraym", "FraymCrudType", "FraymOrder"] {
            let err = validator.validate(name).unwrap_err();
            assert!(
                matches!(err, SchemaError::ReservedNamespace { ref name, .. } if name.starts_with("Fraym"))
            );
        }
    }

    #[test]
    fn test_custom_prefix() {
        let validator = NameValidator::new("Internal");
        assert!(validator.validate("FraymOrder").is_ok());
        assert!(validator.is_reserved("InternalOrder"));
        assert_eq!(validator.reserved_prefix(), "Internal");
    }
}
