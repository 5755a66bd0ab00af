//! Registry of known services and their display metadata.

use serde::{Deserialize, Serialize};

/// A service offered in the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownService {
    /// Display name, also stored as the subscription's `service`.
    pub name: String,
    /// Logo path or URL for the view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl KnownService {
    /// Creates a known service entry.
    #[must_use]
    pub fn new(name: impl Into<String>, logo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logo: Some(logo.into()),
        }
    }
}

const BUILTIN: &[(&str, &str)] = &[
    ("Netflix", "/logos/netflix.png"),
    ("Spotify", "/logos/spotify.png"),
    ("HBO", "/logos/hbo.png"),
    ("Viaplay", "/logos/viaplay.png"),
    ("YoutubeMusic", "/logos/youtubeMusic.png"),
    ("Disney", "/logos/disney.png"),
    ("PrimeVideo", "/logos/primevideo.png"),
    ("AppleTV", "/logos/appleTV.png"),
    ("AppleMusic", "/logos/appleMusic.png"),
    ("DropBox", "/logos/dropbox.png"),
    ("FitBit", "/logos/fitbit.png"),
    ("OneDrive", "/logos/onedrive.png"),
    ("PlaystationPlus", "/logos/ps.png"),
    ("SoundCloud", "/logos/soundcloud.png"),
    ("Steam", "/logos/steam.png"),
];

/// Known services, resolved once at startup.
///
/// Order is preserved so the picker shows entries as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistry {
    services: Vec<KnownService>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(name, logo)| KnownService::new(*name, *logo)),
        )
    }
}

impl ServiceRegistry {
    /// Builds a registry from the given entries.
    ///
    /// Later duplicates of a name are ignored.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = KnownService>) -> Self {
        let mut services: Vec<KnownService> = Vec::new();
        for entry in entries {
            if entry.name.trim().is_empty() || services.iter().any(|s| s.name == entry.name) {
                continue;
            }
            services.push(entry);
        }
        Self { services }
    }

    /// All entries in picker order.
    #[must_use]
    pub fn services(&self) -> &[KnownService] {
        &self.services
    }

    /// Looks up an entry by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KnownService> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Returns true if the name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Logo for a service, if it is known and has one.
    #[must_use]
    pub fn logo_for(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|s| s.logo.as_deref())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = ServiceRegistry::default();
        assert_eq!(registry.len(), 15);
        assert_eq!(registry.services()[0].name, "Netflix");
        assert_eq!(registry.logo_for("PlaystationPlus"), Some("/logos/ps.png"));
        assert!(!registry.contains("netflix"));
    }

    #[test]
    fn test_configured_registry_skips_duplicates_and_blanks() {
        let registry = ServiceRegistry::new([
            KnownService::new("Gym", "/logos/gym.png"),
            KnownService::new("Gym", "/logos/other.png"),
            KnownService {
                name: " ".into(),
                logo: None,
            },
        ]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.logo_for("Gym"), Some("/logos/gym.png"));
    }

    #[test]
    fn test_deserialize_without_logo() {
        let entry: KnownService = serde_json::from_str(r#"{"name":"Newspaper"}"#).unwrap();
        assert_eq!(entry.logo, None);
    }
}
