//! Static shortcut knowledge base keyed by (app context, action label).
//!
//! App contexts are compared in normalised form (see
//! [`normalize_app_key`]); `"*"` is the fallback for any app. A specific
//! entry shadows the wildcard for its app.

mod builtin;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::ActionLabel;
use crate::input::normalize_app_key;

pub use builtin::builtin_entries;

pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutEntry {
    pub app_context: String,
    pub action_label: ActionLabel,
    pub key_combo: String,
    pub tip_text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate catalog entry for ({app_context}, {action_label})")]
    Duplicate {
        app_context: String,
        action_label: ActionLabel,
    },
    #[error("catalog entry for {action_label} has an empty {field}")]
    EmptyField {
        action_label: ActionLabel,
        field: &'static str,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ShortcutCatalog {
    entries: Vec<ShortcutEntry>,
    index: HashMap<(String, ActionLabel), usize>,
}

impl ShortcutCatalog {
    pub fn from_entries(entries: Vec<ShortcutEntry>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_entries(builtin_entries())
    }

    /// Reads a JSON array of entries.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<ShortcutEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    fn insert(&mut self, entry: ShortcutEntry) -> Result<(), CatalogError> {
        for (field, value) in [
            ("app_context", &entry.app_context),
            ("key_combo", &entry.key_combo),
            ("tip_text", &entry.tip_text),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    action_label: entry.action_label,
                    field,
                });
            }
        }

        let key = (normalize_app_key(&entry.app_context), entry.action_label);
        if self.index.contains_key(&key) {
            return Err(CatalogError::Duplicate {
                app_context: entry.app_context,
                action_label: entry.action_label,
            });
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Exact app entry first, then the wildcard.
    pub fn lookup(&self, app_context: &str, action: ActionLabel) -> Option<&ShortcutEntry> {
        let app_key = normalize_app_key(app_context);
        self.index
            .get(&(app_key, action))
            .or_else(|| self.index.get(&(WILDCARD.to_string(), action)))
            .map(|&position| &self.entries[position])
    }

    /// Case-insensitive substring match over combo, tip text, label and app.
    pub fn search(&self, query: &str) -> Vec<&ShortcutEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| {
                entry.key_combo.to_lowercase().contains(&query)
                    || entry.tip_text.to_lowercase().contains(&query)
                    || entry.action_label.as_str().to_lowercase().contains(&query)
                    || entry.app_context.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Entries defined for exactly this app (wildcards excluded).
    pub fn entries_for(&self, app_context: &str) -> Vec<&ShortcutEntry> {
        let app_key = normalize_app_key(app_context);
        self.entries
            .iter()
            .filter(|entry| normalize_app_key(&entry.app_context) == app_key)
            .collect()
    }

    pub fn entries(&self) -> &[ShortcutEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(app: &str, action: ActionLabel, combo: &str) -> ShortcutEntry {
        ShortcutEntry {
            app_context: app.into(),
            action_label: action,
            key_combo: combo.into(),
            tip_text: format!("Press {combo}"),
        }
    }

    #[test]
    fn builtin_catalog_is_consistent() {
        let catalog = ShortcutCatalog::builtin().expect("builtin catalog loads");
        assert_eq!(catalog.len(), builtin_entries().len());
        for label in ActionLabel::ALL {
            assert!(
                catalog.lookup("EXCEL.EXE", label).is_some(),
                "{label} has no excel or wildcard entry"
            );
        }
    }

    #[test]
    fn specific_app_shadows_wildcard() {
        let catalog = ShortcutCatalog::from_entries(vec![
            entry("*", ActionLabel::FindViaToolbar, "Ctrl+F"),
            entry("Excel", ActionLabel::FindViaToolbar, "Ctrl+H"),
        ])
        .unwrap();

        assert_eq!(
            catalog.lookup("EXCEL.EXE", ActionLabel::FindViaToolbar).unwrap().key_combo,
            "Ctrl+H"
        );
        assert_eq!(
            catalog.lookup("notepad.exe", ActionLabel::FindViaToolbar).unwrap().key_combo,
            "Ctrl+F"
        );
        assert!(catalog.lookup("notepad.exe", ActionLabel::BoldViaToolbar).is_none());
    }

    #[test]
    fn duplicate_pairs_are_rejected_after_normalisation() {
        let err = ShortcutCatalog::from_entries(vec![
            entry("EXCEL.EXE", ActionLabel::SaveViaToolbar, "Ctrl+S"),
            entry("excel", ActionLabel::SaveViaToolbar, "Shift+F12"),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate { .. }));
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut bad = entry("*", ActionLabel::SaveViaToolbar, "Ctrl+S");
        bad.tip_text = "  ".into();
        let err = ShortcutCatalog::from_entries(vec![bad]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::EmptyField {
                field: "tip_text",
                ..
            }
        ));
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"app_context": "*", "action_label": "COPY_VIA_CONTEXT_MENU",
             "key_combo": "Ctrl+C", "tip_text": "Press Ctrl+C instead"},
            {"app_context": "chrome.exe", "action_label": "PASTE_VIA_CONTEXT_MENU",
             "key_combo": "Ctrl+Shift+V", "tip_text": "Ctrl+Shift+V pastes without formatting"}
        ]"#;
        let catalog = ShortcutCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries_for("Chrome").len(), 1);
        assert!(matches!(
            ShortcutCatalog::from_json_str(r#"[{"app_context": "*"}]"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShortcutCatalog::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn search_matches_combo_and_text() {
        let catalog = ShortcutCatalog::builtin().unwrap();
        let hits = catalog.search("ctrl+z");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].action_label, ActionLabel::UndoViaToolbar);
        assert!(catalog.search("sheets").iter().any(|e| e.action_label == ActionLabel::SheetSwitchViaClick));
        assert!(catalog.search("   ").is_empty());
    }
}
