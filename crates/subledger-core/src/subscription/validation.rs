//! Input validation for subscription changes.

use chrono::NaiveDate;

use super::model::{NewSubscription, parse_end_date};
use super::registry::ServiceRegistry;

/// Validation error for subscription input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither a known service nor a custom name was given.
    EmptyService,
    /// The selected service is not in the registry.
    UnknownService(String),
    /// End date is empty.
    EmptyEndDate,
    /// End date is not a valid `YYYY-MM-DD` date.
    InvalidEndDate,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyService | Self::EmptyEndDate => "Please fill in all fields!",
            Self::UnknownService(_) => "Please pick a service from the list",
            Self::InvalidEndDate => "Please enter a valid end date (YYYY-MM-DD)",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyService | Self::UnknownService(_) => "service",
            Self::EmptyEndDate | Self::InvalidEndDate => "end_date",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Resolve the service name for a new subscription.
///
/// A selected known service wins over the custom name, mirroring a picker
/// with a free-text fallback.
///
/// # Errors
///
/// Returns `EmptyService` when both inputs are blank and `UnknownService`
/// when the selection is not registered.
pub fn resolve_service(
    registry: &ServiceRegistry,
    selected: &str,
    custom: &str,
) -> Result<String, ValidationError> {
    let selected = selected.trim();
    if !selected.is_empty() {
        return if registry.contains(selected) {
            Ok(selected.to_string())
        } else {
            Err(ValidationError::UnknownService(selected.to_string()))
        };
    }

    let custom = custom.trim();
    if custom.is_empty() {
        return Err(ValidationError::EmptyService);
    }
    Ok(custom.to_string())
}

/// Validate a date typed by the user.
///
/// # Errors
///
/// Returns `EmptyEndDate` for blank input and `InvalidEndDate` when the
/// text is not a date.
pub fn validate_end_date(input: &str) -> Result<NaiveDate, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::EmptyEndDate);
    }
    parse_end_date(input).ok_or(ValidationError::InvalidEndDate)
}

/// Validate the add-subscription inputs.
///
/// The service is checked first so a completely empty form reports the
/// same "fill in all fields" error as a half-filled one.
///
/// # Errors
///
/// Returns the first `ValidationError` found.
pub fn validate_new_subscription(
    registry: &ServiceRegistry,
    selected: &str,
    custom: &str,
    end_date: &str,
) -> Result<NewSubscription, ValidationError> {
    let service = resolve_service(registry, selected, custom)?;
    let end_date = validate_end_date(end_date)?;
    Ok(NewSubscription { service, end_date })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_service_wins() {
        let registry = ServiceRegistry::default();
        let service = resolve_service(&registry, "Netflix", "My Gym").unwrap();
        assert_eq!(service, "Netflix");
    }

    #[test]
    fn test_custom_service_fallback() {
        let registry = ServiceRegistry::default();
        let service = resolve_service(&registry, "", "  My Gym ").unwrap();
        assert_eq!(service, "My Gym");
    }

    #[test]
    fn test_empty_service() {
        let registry = ServiceRegistry::default();
        assert_eq!(
            resolve_service(&registry, " ", ""),
            Err(ValidationError::EmptyService)
        );
    }

    #[test]
    fn test_unknown_selection() {
        let registry = ServiceRegistry::default();
        let err = resolve_service(&registry, "Blockbuster", "").unwrap_err();
        assert_eq!(err.field(), "service");
        assert!(matches!(err, ValidationError::UnknownService(name) if name == "Blockbuster"));
    }

    #[test]
    fn test_end_date_validation() {
        assert_eq!(validate_end_date(""), Err(ValidationError::EmptyEndDate));
        assert_eq!(
            validate_end_date("2025-02-30"),
            Err(ValidationError::InvalidEndDate)
        );
        assert_eq!(
            validate_end_date("2025-02-28"),
            Ok(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
        );
    }

    #[test]
    fn test_empty_form_reports_fill_in_all_fields() {
        let registry = ServiceRegistry::default();
        let err = validate_new_subscription(&registry, "", "", "").unwrap_err();
        assert_eq!(err.message(), "Please fill in all fields!");
    }
}
