//! Field validation for restaurants and pizzas

/// Validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingName,
    MissingAddress,
    MissingIngredients,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "Name is required"),
            Self::MissingAddress => write!(f, "Address is required"),
            Self::MissingIngredients => write!(f, "Ingredients are required"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject empty or whitespace-only text
pub(crate) fn validate_required(value: &str, error: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("Margherita", ValidationError::MissingName).is_ok());
        assert_eq!(
            validate_required("", ValidationError::MissingName),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            validate_required(" \t", ValidationError::MissingAddress),
            Err(ValidationError::MissingAddress)
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::MissingIngredients.to_string(), "Ingredients are required");
    }
}
