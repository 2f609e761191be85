use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::input::NormalizedEvent;

/// Slow-path actions the classifier recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionLabel {
    CopyViaContextMenu,
    CutViaContextMenu,
    PasteViaContextMenu,
    SheetSwitchViaClick,
    RangeSelectViaClick,
    JumpToDataEdgeViaClick,
    SaveViaToolbar,
    UndoViaToolbar,
    RedoViaToolbar,
    BoldViaToolbar,
    ItalicViaToolbar,
    UnderlineViaToolbar,
    FindViaToolbar,
    PrintViaToolbar,
}

impl ActionLabel {
    pub const ALL: [ActionLabel; 14] = [
        ActionLabel::CopyViaContextMenu,
        ActionLabel::CutViaContextMenu,
        ActionLabel::PasteViaContextMenu,
        ActionLabel::SheetSwitchViaClick,
        ActionLabel::RangeSelectViaClick,
        ActionLabel::JumpToDataEdgeViaClick,
        ActionLabel::SaveViaToolbar,
        ActionLabel::UndoViaToolbar,
        ActionLabel::RedoViaToolbar,
        ActionLabel::BoldViaToolbar,
        ActionLabel::ItalicViaToolbar,
        ActionLabel::UnderlineViaToolbar,
        ActionLabel::FindViaToolbar,
        ActionLabel::PrintViaToolbar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionLabel::CopyViaContextMenu => "COPY_VIA_CONTEXT_MENU",
            ActionLabel::CutViaContextMenu => "CUT_VIA_CONTEXT_MENU",
            ActionLabel::PasteViaContextMenu => "PASTE_VIA_CONTEXT_MENU",
            ActionLabel::SheetSwitchViaClick => "SHEET_SWITCH_VIA_CLICK",
            ActionLabel::RangeSelectViaClick => "RANGE_SELECT_VIA_CLICK",
            ActionLabel::JumpToDataEdgeViaClick => "JUMP_TO_DATA_EDGE_VIA_CLICK",
            ActionLabel::SaveViaToolbar => "SAVE_VIA_TOOLBAR",
            ActionLabel::UndoViaToolbar => "UNDO_VIA_TOOLBAR",
            ActionLabel::RedoViaToolbar => "REDO_VIA_TOOLBAR",
            ActionLabel::BoldViaToolbar => "BOLD_VIA_TOOLBAR",
            ActionLabel::ItalicViaToolbar => "ITALIC_VIA_TOOLBAR",
            ActionLabel::UnderlineViaToolbar => "UNDERLINE_VIA_TOOLBAR",
            ActionLabel::FindViaToolbar => "FIND_VIA_TOOLBAR",
            ActionLabel::PrintViaToolbar => "PRINT_VIA_TOOLBAR",
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionLabel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ActionLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown action label '{value}'"))
    }
}

/// A recognised slow-path action, consumed once by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCandidate {
    pub action: ActionLabel,
    pub app_context: String,
    /// Matched events, oldest first.
    pub evidence: Vec<NormalizedEvent>,
    pub detected_at_ms: u64,
}

impl ActionCandidate {
    pub fn evidence_categories(&self) -> Vec<crate::input::EventCategory> {
        self.evidence.iter().map(|event| event.category).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_from_their_wire_names() {
        for label in ActionLabel::ALL {
            assert_eq!(label.as_str().parse::<ActionLabel>(), Ok(label));
        }
        assert_eq!(
            "copy_via_context_menu".parse::<ActionLabel>(),
            Ok(ActionLabel::CopyViaContextMenu)
        );
        assert!("COPY".parse::<ActionLabel>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&ActionLabel::SheetSwitchViaClick).unwrap();
        assert_eq!(json, "\"SHEET_SWITCH_VIA_CLICK\"");
    }
}
