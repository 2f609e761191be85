use serde::{Deserialize, Serialize};

pub const UNKNOWN_APP: &str = "Unknown App";

/// Foreground application as last reported by the focus source.
///
/// Owned by the pipeline and handed to each stage by reference; the
/// normalizer is the only writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppContext {
    pub app_name: String,
    pub window_title: String,
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            app_name: UNKNOWN_APP.to_string(),
            window_title: String::new(),
        }
    }
}

impl AppContext {
    pub fn new(app_name: impl Into<String>, window_title: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            window_title: window_title.into(),
        }
    }

    /// Lookup key for catalog and rule matching.
    pub fn key(&self) -> String {
        normalize_app_key(&self.app_name)
    }
}

/// Display names the macOS focus source reports, keyed to the process stem
/// Windows reports for the same app.
const APP_ALIASES: [(&str, &str); 4] = [
    ("microsoft excel", "excel"),
    ("google chrome", "chrome"),
    ("visual studio code", "code"),
    ("microsoft word", "winword"),
];

/// Canonical app key shared by catalog lookup, rule scoping and the
/// debouncer: lower-cased, `.exe`/`.app` dropped, known display names mapped
/// to their process stem. `EXCEL.EXE`, `Excel` and `Microsoft Excel` all
/// become `excel`.
pub fn normalize_app_key(app: &str) -> String {
    let lower = app.trim().to_lowercase();
    let stem = lower
        .strip_suffix(".exe")
        .or_else(|| lower.strip_suffix(".app"))
        .unwrap_or(&lower);
    APP_ALIASES
        .iter()
        .find(|(display, _)| *display == stem)
        .map(|(_, process)| process.to_string())
        .unwrap_or_else(|| stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_and_display_names_share_a_key() {
        assert_eq!(normalize_app_key("EXCEL.EXE"), "excel");
        assert_eq!(normalize_app_key(" Excel "), "excel");
        assert_eq!(normalize_app_key("chrome.exe"), "chrome");
        assert_eq!(normalize_app_key("*"), "*");
    }

    #[test]
    fn display_names_map_to_process_keys() {
        assert_eq!(normalize_app_key("Microsoft Excel"), "excel");
        assert_eq!(normalize_app_key("Google Chrome.app"), "chrome");
        assert_eq!(normalize_app_key("Visual Studio Code"), "code");
        assert_eq!(normalize_app_key("Microsoft Teams"), "microsoft teams");
    }

    #[test]
    fn default_context_is_unknown_app() {
        let ctx = AppContext::default();
        assert_eq!(ctx.app_name, UNKNOWN_APP);
        assert_eq!(ctx.key(), "unknown app");
    }
}
