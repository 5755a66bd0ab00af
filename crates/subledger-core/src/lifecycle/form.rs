//! Add-subscription form state.

/// Inputs of the add form.
///
/// The controller clears the form only after the store accepted it, so a
/// failed attempt keeps what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    /// Service picked from the registry, or empty.
    pub selected_service: String,
    /// Free-text service name used when nothing is picked.
    pub custom_service: String,
    /// End date as typed (`YYYY-MM-DD`).
    pub end_date: String,
}

impl AddForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form with a service picked from the registry.
    #[must_use]
    pub fn known(service: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            selected_service: service.into(),
            custom_service: String::new(),
            end_date: end_date.into(),
        }
    }

    /// Form with a free-text service name.
    #[must_use]
    pub fn custom(service: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            selected_service: String::new(),
            custom_service: service.into(),
            end_date: end_date.into(),
        }
    }

    /// Picks a known service. Clears the custom name, like a picker does.
    pub fn select_service(&mut self, service: impl Into<String>) {
        self.selected_service = service.into();
        self.custom_service.clear();
    }

    /// Returns true if every field is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.selected_service.trim().is_empty()
            && self.custom_service.trim().is_empty()
            && self.end_date.trim().is_empty()
    }

    /// Clears every field.
    pub fn clear(&mut self) {
        self.selected_service.clear();
        self.custom_service.clear();
        self.end_date.clear();
    }
}
