//! Declarative pattern rules, evaluated in priority order.
//!
//! Every rule looks at the newest buffered event (the trigger) and, if needed,
//! walks back through the buffer for the events that complete its pattern.
//! Adding a detection means adding a variant here and a slot in
//! [`default_rules`].

use crate::input::{normalize_app_key, AppContext, EventCategory};

use super::action::ActionLabel;
use super::config::ClassifierConfig;
use super::locator::RegionLabel;
use super::window::{BufferedEvent, EventWindow};

/// Key used to scope the spreadsheet rules.
pub const SPREADSHEET_APP: &str = "excel";

const TOOLBAR_KEYWORDS: [(&str, ActionLabel); 8] = [
    ("save", ActionLabel::SaveViaToolbar),
    ("undo", ActionLabel::UndoViaToolbar),
    ("redo", ActionLabel::RedoViaToolbar),
    ("bold", ActionLabel::BoldViaToolbar),
    ("italic", ActionLabel::ItalicViaToolbar),
    ("underline", ActionLabel::UnderlineViaToolbar),
    ("find", ActionLabel::FindViaToolbar),
    ("print", ActionLabel::PrintViaToolbar),
];

/// Selection memory that outlives the buffer horizon. Cleared on app switch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionState {
    /// App the selection was made in.
    pub app_key: String,
    /// Most recent unmodified cell selection as (column, row).
    pub last_cell: Option<(String, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// A slow-path action; `evidence` indexes into the window, oldest first.
    Emit {
        action: ActionLabel,
        evidence: Vec<usize>,
    },
    /// The user already took the fast path. Evidence is consumed, nothing is
    /// emitted.
    FastPath { evidence: Vec<usize> },
}

impl RuleMatch {
    pub fn evidence(&self) -> &[usize] {
        match self {
            RuleMatch::Emit { evidence, .. } | RuleMatch::FastPath { evidence } => evidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternRule {
    /// Ctrl/Cmd + C, X or V.
    FastPathShortcut,
    /// Left click on a worksheet tab.
    SheetTabClick { app: String },
    /// Unmodified left click on a row or column header.
    HeaderClick { app: String },
    /// Cell selection below row 1, then row 1 of the same column, however
    /// long the user scrolled in between.
    DataEdgeJump { app: String },
    /// Right click, then a Copy/Cut/Paste item of the context menu.
    ContextMenuChoice,
    /// Right click followed by a clipboard change.
    ContextMenuCopy,
    /// Left click on a toolbar/ribbon button that has a shortcut.
    ToolbarButton,
}

/// Rules in priority order: fast path first, app-qualified rules before
/// generic ones.
pub fn default_rules() -> Vec<PatternRule> {
    vec![
        PatternRule::FastPathShortcut,
        PatternRule::SheetTabClick {
            app: SPREADSHEET_APP.into(),
        },
        PatternRule::HeaderClick {
            app: SPREADSHEET_APP.into(),
        },
        PatternRule::DataEdgeJump {
            app: SPREADSHEET_APP.into(),
        },
        PatternRule::ContextMenuChoice,
        PatternRule::ContextMenuCopy,
        PatternRule::ToolbarButton,
    ]
}

impl PatternRule {
    pub fn name(&self) -> &'static str {
        match self {
            PatternRule::FastPathShortcut => "fast_path_shortcut",
            PatternRule::SheetTabClick { .. } => "sheet_tab_click",
            PatternRule::HeaderClick { .. } => "header_click",
            PatternRule::DataEdgeJump { .. } => "data_edge_jump",
            PatternRule::ContextMenuChoice => "context_menu_choice",
            PatternRule::ContextMenuCopy => "context_menu_copy",
            PatternRule::ToolbarButton => "toolbar_button",
        }
    }

    pub fn app_scope(&self) -> Option<&str> {
        match self {
            PatternRule::SheetTabClick { app }
            | PatternRule::HeaderClick { app }
            | PatternRule::DataEdgeJump { app } => Some(app),
            _ => None,
        }
    }

    /// Same key comparison the catalog uses, so a scoped rule only fires
    /// where its shortcut can be found.
    fn applies_to(&self, app_key: &str) -> bool {
        match self.app_scope() {
            Some(app) => normalize_app_key(app) == app_key,
            None => true,
        }
    }

    pub fn evaluate(
        &self,
        window: &EventWindow,
        context: &AppContext,
        config: &ClassifierConfig,
        selection: &SelectionState,
    ) -> Option<RuleMatch> {
        if !self.applies_to(&context.key()) {
            return None;
        }

        let entries: Vec<&BufferedEvent> = window.entries().iter().collect();
        let last = entries.len().checked_sub(1)?;
        let trigger = entries[last];

        match self {
            PatternRule::FastPathShortcut => {
                if !trigger.event.is_fast_path_key() {
                    return None;
                }
                let mut evidence = Vec::with_capacity(2);
                if let Some(modifier) = (0..last).rev().find(|&i| {
                    matches!(
                        entries[i].event.category,
                        EventCategory::KeyCtrl | EventCategory::KeyMeta
                    )
                }) {
                    evidence.push(modifier);
                }
                evidence.push(last);
                Some(RuleMatch::FastPath { evidence })
            }
            PatternRule::SheetTabClick { .. } => match left_click_region(trigger)? {
                RegionLabel::SheetTab => Some(emit(ActionLabel::SheetSwitchViaClick, vec![last])),
                _ => None,
            },
            PatternRule::HeaderClick { .. } => {
                if trigger.event.modifiers.any() {
                    return None;
                }
                match left_click_region(trigger)? {
                    RegionLabel::ColumnHeader | RegionLabel::RowHeader => {
                        Some(emit(ActionLabel::RangeSelectViaClick, vec![last]))
                    }
                    _ => None,
                }
            }
            PatternRule::DataEdgeJump { .. } => {
                if trigger.event.modifiers.any() {
                    return None;
                }
                let RegionLabel::Cell { column, row: 1 } = left_click_region(trigger)? else {
                    return None;
                };
                let (from_column, from_row) = selection.last_cell.as_ref()?;
                if from_column != column || *from_row <= 1 {
                    return None;
                }
                let mut evidence = Vec::with_capacity(2);
                if let Some(from) = previous_click(&entries, last).filter(|&i| {
                    matches!(
                        left_click_region(entries[i]),
                        Some(RegionLabel::Cell { column: c, row: r }) if c == from_column && r == from_row
                    )
                }) {
                    evidence.push(from);
                }
                evidence.push(last);
                Some(emit(ActionLabel::JumpToDataEdgeViaClick, evidence))
            }
            PatternRule::ContextMenuChoice => {
                let RegionLabel::MenuItem(item) = left_click_region(trigger)? else {
                    return None;
                };
                let action = menu_item_action(item)?;
                let opener = previous_click(&entries, last)?;
                if entries[opener].event.category != EventCategory::RightClick
                    || gap_ms(entries[opener], trigger) > config.menu_window_ms
                    || fast_path_between(&entries, opener, last)
                {
                    return None;
                }
                Some(emit(action, vec![opener, last]))
            }
            PatternRule::ContextMenuCopy => {
                if trigger.event.category != EventCategory::ClipboardChanged {
                    return None;
                }
                let opener = (0..last)
                    .rev()
                    .find(|&i| entries[i].event.category == EventCategory::RightClick)?;
                if gap_ms(entries[opener], trigger) > config.window_ms
                    || fast_path_between(&entries, opener, last)
                {
                    return None;
                }
                Some(emit(ActionLabel::CopyViaContextMenu, vec![opener, last]))
            }
            PatternRule::ToolbarButton => {
                let RegionLabel::ToolbarButton(name) = left_click_region(trigger)? else {
                    return None;
                };
                toolbar_action(name).map(|action| emit(action, vec![last]))
            }
        }
    }
}

fn emit(action: ActionLabel, evidence: Vec<usize>) -> RuleMatch {
    RuleMatch::Emit { action, evidence }
}

fn left_click_region(entry: &BufferedEvent) -> Option<&RegionLabel> {
    if entry.event.category != EventCategory::LeftClick {
        return None;
    }
    entry.region.as_ref()
}

fn previous_click(entries: &[&BufferedEvent], before: usize) -> Option<usize> {
    (0..before).rev().find(|&i| entries[i].event.category.is_click())
}

fn fast_path_between(entries: &[&BufferedEvent], from: usize, to: usize) -> bool {
    (from + 1..to).any(|i| entries[i].event.is_fast_path_key())
}

fn gap_ms(earlier: &BufferedEvent, later: &BufferedEvent) -> u64 {
    later
        .event
        .timestamp_ms
        .saturating_sub(earlier.event.timestamp_ms)
}

/// Menu item names may carry accelerators (`&Copy`) and a tab-separated
/// shortcut hint (`Copy\tCtrl+C`).
fn menu_item_action(item: &str) -> Option<ActionLabel> {
    let label: String = item
        .split('\t')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| *c != '&')
        .collect();
    match label.trim().to_lowercase().as_str() {
        "copy" => Some(ActionLabel::CopyViaContextMenu),
        "cut" => Some(ActionLabel::CutViaContextMenu),
        "paste" => Some(ActionLabel::PasteViaContextMenu),
        _ => None,
    }
}

fn toolbar_action(name: &str) -> Option<ActionLabel> {
    let lower = name.trim().to_lowercase();
    // "Save As" and the app's own shortcut settings have no single-key equivalent
    if lower.contains("shortcut") || lower.starts_with("save as") {
        return None;
    }
    TOOLBAR_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, action)| *action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_items_ignore_accelerators_and_hints() {
        assert_eq!(menu_item_action("&Copy"), Some(ActionLabel::CopyViaContextMenu));
        assert_eq!(menu_item_action("Cu&t\tCtrl+X"), Some(ActionLabel::CutViaContextMenu));
        assert_eq!(menu_item_action("Paste"), Some(ActionLabel::PasteViaContextMenu));
        assert_eq!(menu_item_action("Paste Special..."), None);
        assert_eq!(menu_item_action("Rename"), None);
    }

    #[test]
    fn toolbar_names_map_to_actions() {
        assert_eq!(toolbar_action("Save"), Some(ActionLabel::SaveViaToolbar));
        assert_eq!(toolbar_action("Bold (Ctrl+B)"), Some(ActionLabel::BoldViaToolbar));
        assert_eq!(toolbar_action("Find & Select"), Some(ActionLabel::FindViaToolbar));
        assert_eq!(toolbar_action("Save As"), None);
        assert_eq!(toolbar_action("Keyboard shortcuts"), None);
        assert_eq!(toolbar_action("Insert Chart"), None);
    }

    #[test]
    fn spreadsheet_rules_are_scoped() {
        let rule = PatternRule::HeaderClick {
            app: SPREADSHEET_APP.into(),
        };
        assert!(rule.applies_to("excel"));
        assert!(rule.applies_to(&normalize_app_key("Microsoft Excel")));
        assert!(!rule.applies_to("chrome"));
        assert!(!rule.applies_to("excel viewer"));
        assert!(PatternRule::ContextMenuCopy.applies_to("anything"));
    }

    #[test]
    fn fast_path_outranks_everything() {
        assert_eq!(default_rules()[0], PatternRule::FastPathShortcut);
        let scoped = default_rules()
            .iter()
            .position(|rule| rule.app_scope().is_some())
            .unwrap();
        let generic = default_rules()
            .iter()
            .skip(1)
            .position(|rule| rule.app_scope().is_none())
            .unwrap()
            + 1;
        assert!(scoped < generic);
    }
}
