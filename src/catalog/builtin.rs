use crate::classifier::ActionLabel;

use super::{ShortcutEntry, WILDCARD};

fn entry(app_context: &str, action_label: ActionLabel, key_combo: &str, tip_text: &str) -> ShortcutEntry {
    ShortcutEntry {
        app_context: app_context.into(),
        action_label,
        key_combo: key_combo.into(),
        tip_text: tip_text.into(),
    }
}

/// Shortcuts shipped with the app. Windows key combos; a catalog file can
/// replace the whole table.
pub fn builtin_entries() -> Vec<ShortcutEntry> {
    vec![
        entry(WILDCARD, ActionLabel::CopyViaContextMenu, "Ctrl+C", "Press Ctrl+C instead"),
        entry(WILDCARD, ActionLabel::CutViaContextMenu, "Ctrl+X", "Press Ctrl+X instead"),
        entry(WILDCARD, ActionLabel::PasteViaContextMenu, "Ctrl+V", "Press Ctrl+V instead"),
        entry(WILDCARD, ActionLabel::SaveViaToolbar, "Ctrl+S", "Press Ctrl+S to save"),
        entry(WILDCARD, ActionLabel::UndoViaToolbar, "Ctrl+Z", "Press Ctrl+Z to undo"),
        entry(WILDCARD, ActionLabel::RedoViaToolbar, "Ctrl+Y", "Press Ctrl+Y to redo"),
        entry(WILDCARD, ActionLabel::BoldViaToolbar, "Ctrl+B", "Press Ctrl+B for bold"),
        entry(WILDCARD, ActionLabel::ItalicViaToolbar, "Ctrl+I", "Press Ctrl+I for italic"),
        entry(WILDCARD, ActionLabel::UnderlineViaToolbar, "Ctrl+U", "Press Ctrl+U to underline"),
        entry(WILDCARD, ActionLabel::FindViaToolbar, "Ctrl+F", "Press Ctrl+F to find"),
        entry(WILDCARD, ActionLabel::PrintViaToolbar, "Ctrl+P", "Press Ctrl+P to print"),
        entry(
            "excel",
            ActionLabel::SheetSwitchViaClick,
            "Ctrl+Page Down / Ctrl+Page Up",
            "Press Ctrl+PgDn or Ctrl+PgUp to move between sheets",
        ),
        entry(
            "excel",
            ActionLabel::RangeSelectViaClick,
            "Ctrl+Space / Shift+Space",
            "Press Ctrl+Space to select the column, Shift+Space to select the row",
        ),
        entry(
            "excel",
            ActionLabel::JumpToDataEdgeViaClick,
            "Ctrl+Up",
            "Press Ctrl+Up to jump to the top of the data region",
        ),
        entry(
            "excel",
            ActionLabel::RedoViaToolbar,
            "Ctrl+Y",
            "Press Ctrl+Y to redo or repeat the last action",
        ),
        entry(
            "excel",
            ActionLabel::FindViaToolbar,
            "Ctrl+F / Ctrl+H",
            "Press Ctrl+F to find, Ctrl+H to replace",
        ),
        entry(
            "chrome",
            ActionLabel::FindViaToolbar,
            "Ctrl+F",
            "Press Ctrl+F to search this page",
        ),
        entry(
            "code",
            ActionLabel::FindViaToolbar,
            "Ctrl+F / Ctrl+Shift+F",
            "Press Ctrl+F to find in the file, Ctrl+Shift+F to search the workspace",
        ),
    ]
}
