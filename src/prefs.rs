//! Persisted preferences: four independent fields, each written through to
//! browser localStorage on change. No cross-field transaction, no validation
//! of the API URL text.

use web_sys::Storage;

use crate::i18n::Locale;

pub const KEY_LANGUAGE: &str = "language";
pub const KEY_THEME: &str = "theme";
pub const KEY_NOTIFICATIONS: &str = "notifications";
pub const KEY_API_URL: &str = "apiUrl";

/// Default gateway address; overridable at build time so deployments can bake
/// in their endpoint the way the original read it from the build environment.
pub const DEFAULT_API_URL: &str = match option_env!("SOULBIT_API_URL") {
    Some(url) => url,
    None => "http://localhost:8080",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored value, also the `data-theme` attribute on the document root.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(value: &str) -> Theme {
        match value {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub locale: Locale,
    pub notifications_enabled: bool,
    pub api_base_url: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            locale: Locale::ZhCn,
            notifications_enabled: true,
            api_base_url: DEFAULT_API_URL.to_owned(),
        }
    }
}

impl Preferences {
    /// Rebuild preferences from raw stored strings; absent or unparseable
    /// values fall back to the field default. Pure, so the parsing rules are
    /// testable without a browser.
    pub fn from_stored(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            theme: get(KEY_THEME)
                .map(|v| Theme::from_str(&v))
                .unwrap_or(defaults.theme),
            locale: get(KEY_LANGUAGE)
                .map(|v| Locale::from_tag(&v))
                .unwrap_or(defaults.locale),
            // Stored as a JSON boolean ("true"/"false").
            notifications_enabled: get(KEY_NOTIFICATIONS)
                .and_then(|v| serde_json::from_str(&v).ok())
                .unwrap_or(defaults.notifications_enabled),
            api_base_url: get(KEY_API_URL).unwrap_or(defaults.api_base_url),
        }
    }

    /// Load from localStorage; defaults when storage is unavailable.
    pub fn load() -> Self {
        match storage() {
            Some(store) => Self::from_stored(|key| store.get_item(key).ok().flatten()),
            None => Self::default(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        persist(KEY_THEME, theme.as_str());
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        persist(KEY_LANGUAGE, locale.as_tag());
    }

    pub fn set_notifications(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
        persist(KEY_NOTIFICATIONS, if enabled { "true" } else { "false" });
    }

    pub fn set_api_base_url(&mut self, url: &str) {
        self.api_base_url = url.to_owned();
        persist(KEY_API_URL, url);
    }
}

fn storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn persist(key: &str, value: &str) {
    if let Some(store) = storage() {
        store.set_item(key, value).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn stored(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn absent_storage_yields_defaults() {
        let prefs = Preferences::from_stored(|_| None);
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.locale, Locale::ZhCn);
        assert!(prefs.notifications_enabled);
        assert_eq!(prefs.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn stored_values_are_honored() {
        let map = stored(&[
            ("theme", "dark"),
            ("language", "en-US"),
            ("notifications", "false"),
            ("apiUrl", "https://api.example.com"),
        ]);
        let prefs = Preferences::from_stored(|k| map.get(k).cloned());
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.locale, Locale::EnUs);
        assert!(!prefs.notifications_enabled);
        assert_eq!(prefs.api_base_url, "https://api.example.com");
    }

    #[test]
    fn garbage_values_fall_back_per_field() {
        let map = stored(&[("theme", "neon"), ("notifications", "not-json")]);
        let prefs = Preferences::from_stored(|k| map.get(k).cloned());
        assert_eq!(prefs.theme, Theme::Light);
        assert!(prefs.notifications_enabled);
    }

    #[test]
    fn theme_toggle_round_trips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::from_str(Theme::Dark.as_str()), Theme::Dark);
    }
}
