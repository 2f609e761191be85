//! Maps a classified action onto the catalog entry that teaches its shortcut.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::ShortcutCatalog;
use crate::classifier::{ActionCandidate, ActionLabel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTip {
    pub action: ActionLabel,
    /// App the action happened in, as reported by focus tracking.
    pub app_context: String,
    /// Catalog app the entry was found under (`"*"` for the fallback).
    pub matched_context: String,
    pub key_combo: String,
    pub tip_text: String,
    pub detected_at_ms: u64,
}

#[derive(Clone)]
pub struct TipResolver {
    catalog: Arc<ShortcutCatalog>,
}

impl TipResolver {
    pub fn new(catalog: Arc<ShortcutCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ShortcutCatalog {
        &self.catalog
    }

    /// Pure lookup; `None` means the action has no known shortcut here.
    pub fn resolve(&self, candidate: &ActionCandidate) -> Option<ResolvedTip> {
        let entry = self
            .catalog
            .lookup(&candidate.app_context, candidate.action)?;
        Some(ResolvedTip {
            action: candidate.action,
            app_context: candidate.app_context.clone(),
            matched_context: entry.app_context.clone(),
            key_combo: entry.key_combo.clone(),
            tip_text: entry.tip_text.clone(),
            detected_at_ms: candidate.detected_at_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::UNKNOWN_APP;

    fn candidate(action: ActionLabel, app: &str) -> ActionCandidate {
        ActionCandidate {
            action,
            app_context: app.into(),
            evidence: Vec::new(),
            detected_at_ms: 1_200,
        }
    }

    fn resolver() -> TipResolver {
        TipResolver::new(Arc::new(ShortcutCatalog::builtin().unwrap()))
    }

    #[test]
    fn falls_back_to_wildcard_entry() {
        let tip = resolver()
            .resolve(&candidate(ActionLabel::CopyViaContextMenu, "chrome.exe"))
            .unwrap();
        assert_eq!(tip.key_combo, "Ctrl+C");
        assert_eq!(tip.tip_text, "Press Ctrl+C instead");
        assert_eq!(tip.matched_context, "*");
        assert_eq!(tip.app_context, "chrome.exe");
        assert_eq!(tip.detected_at_ms, 1_200);
    }

    #[test]
    fn prefers_app_specific_entry() {
        let tip = resolver()
            .resolve(&candidate(ActionLabel::FindViaToolbar, "EXCEL.EXE"))
            .unwrap();
        assert_eq!(tip.matched_context, "excel");
        assert_eq!(tip.key_combo, "Ctrl+F / Ctrl+H");
    }

    #[test]
    fn unknown_app_without_wildcard_resolves_to_nothing() {
        let resolver = resolver();
        assert!(resolver
            .resolve(&candidate(ActionLabel::SheetSwitchViaClick, UNKNOWN_APP))
            .is_none());
        assert!(resolver
            .resolve(&candidate(ActionLabel::SaveViaToolbar, UNKNOWN_APP))
            .is_some());
    }

    #[test]
    fn resolving_twice_gives_the_same_tip() {
        let resolver = resolver();
        let c = candidate(ActionLabel::JumpToDataEdgeViaClick, "excel");
        assert_eq!(resolver.resolve(&c), resolver.resolve(&c));
    }
}
