use sha2::{Digest, Sha256};

use super::context::AppContext;
use super::types::{
    EventCategory, Key, Modifiers, MouseButton, NormalizedEvent, RawEventKind, RawInputEvent,
};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Turns raw hook events into normalized events.
///
/// Holds the only state needed to do so: which modifiers are down and the
/// hash of the last clipboard payload. Clipboard text is hashed and dropped
/// inside `normalize`.
#[derive(Debug, Default)]
pub struct Normalizer {
    modifiers: Modifiers,
    last_clipboard_hash: Option<[u8; 32]>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Returns `None` for anything that carries no classifier signal:
    /// key/mouse releases, auto-repeat of held modifiers, unknown buttons,
    /// unchanged clipboard contents, redundant focus reports and malformed
    /// payloads.
    pub fn normalize(
        &mut self,
        raw: RawInputEvent,
        context: &mut AppContext,
    ) -> Option<NormalizedEvent> {
        let timestamp_ms = raw.timestamp_ms;
        let (category, position) = match raw.kind {
            RawEventKind::KeyDown { key } => {
                let key = Key::from_name(&key)?;
                if key.is_modifier() {
                    if self.modifiers.is_held(key) {
                        return None;
                    }
                    self.modifiers.set(key, true);
                }
                (key.category(), None)
            }
            RawEventKind::KeyUp { key } => {
                if let Some(key) = Key::from_name(&key) {
                    self.modifiers.set(key, false);
                }
                return None;
            }
            RawEventKind::MouseDown { button, x, y } => {
                let button = MouseButton::from_name(&button)?;
                (button.category(), Some((x, y)))
            }
            RawEventKind::MouseUp { .. } => return None,
            RawEventKind::ClipboardChange { content } => {
                let content = content.filter(|text| !text.is_empty())?;
                if !self.clipboard_changed(&content) {
                    return None;
                }
                (EventCategory::ClipboardChanged, None)
            }
            RawEventKind::FocusChange {
                app_name,
                window_title,
            } => {
                let app_name = app_name.trim();
                if app_name.is_empty() {
                    return None;
                }
                if context.app_name == app_name && context.window_title == window_title {
                    return None;
                }
                log_debug!("focus moved to {} ({})", app_name, window_title);
                *context = AppContext::new(app_name, window_title);
                (EventCategory::FocusChanged, None)
            }
        };

        Some(NormalizedEvent {
            timestamp_ms,
            category,
            app_context: context.app_name.clone(),
            window_title: context.window_title.clone(),
            modifiers: self.modifiers,
            position,
        })
    }

    /// Hooks may re-announce an unchanged clipboard (e.g. on focus return);
    /// only a new digest counts.
    fn clipboard_changed(&mut self, content: &str) -> bool {
        let digest: [u8; 32] = Sha256::digest(content.as_bytes()).into();
        self.last_clipboard_hash.replace(digest) != Some(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(normalizer: &mut Normalizer, ctx: &mut AppContext, raw: RawInputEvent) -> Option<EventCategory> {
        normalizer.normalize(raw, ctx).map(|event| event.category)
    }

    #[test]
    fn clicks_map_to_categories_with_position() {
        let mut normalizer = Normalizer::new();
        let mut ctx = AppContext::new("chrome.exe", "Docs");

        let event = normalizer
            .normalize(RawInputEvent::mouse_down(5, "right", 40, 80), &mut ctx)
            .expect("right click");
        assert_eq!(event.category, EventCategory::RightClick);
        assert_eq!(event.position, Some((40, 80)));
        assert_eq!(event.app_context, "chrome.exe");
        assert_eq!(event.window_title, "Docs");

        assert_eq!(
            run(&mut normalizer, &mut ctx, RawInputEvent::mouse_down(6, "Button.left", 0, 0)),
            Some(EventCategory::LeftClick)
        );
        assert_eq!(
            run(&mut normalizer, &mut ctx, RawInputEvent::mouse_down(7, "x2", 0, 0)),
            None
        );
    }

    #[test]
    fn releases_are_dropped_but_update_modifiers() {
        let mut normalizer = Normalizer::new();
        let mut ctx = AppContext::default();

        assert_eq!(
            run(&mut normalizer, &mut ctx, RawInputEvent::key_down(0, "Key.ctrl_l")),
            Some(EventCategory::KeyCtrl)
        );
        // auto-repeat
        assert_eq!(run(&mut normalizer, &mut ctx, RawInputEvent::key_down(30, "ctrl")), None);

        let c = normalizer
            .normalize(RawInputEvent::key_down(40, "c"), &mut ctx)
            .expect("key c");
        assert_eq!(c.category, EventCategory::KeyC);
        assert!(c.modifiers.ctrl);
        assert!(c.is_fast_path_key());

        assert_eq!(run(&mut normalizer, &mut ctx, RawInputEvent::key_up(60, "ctrl")), None);
        let c = normalizer
            .normalize(RawInputEvent::key_down(80, "c"), &mut ctx)
            .expect("key c");
        assert!(!c.modifiers.ctrl);
        assert!(!c.is_fast_path_key());
    }

    #[test]
    fn clipboard_emits_only_on_content_change() {
        let mut normalizer = Normalizer::new();
        let mut ctx = AppContext::default();

        assert_eq!(
            run(&mut normalizer, &mut ctx, RawInputEvent::clipboard(0, "first")),
            Some(EventCategory::ClipboardChanged)
        );
        assert_eq!(run(&mut normalizer, &mut ctx, RawInputEvent::clipboard(10, "first")), None);
        assert_eq!(
            run(&mut normalizer, &mut ctx, RawInputEvent::clipboard(20, "second")),
            Some(EventCategory::ClipboardChanged)
        );
        assert_eq!(run(&mut normalizer, &mut ctx, RawInputEvent::clipboard(30, "")), None);
        assert_eq!(
            run(
                &mut normalizer,
                &mut ctx,
                RawInputEvent::new(40, RawEventKind::ClipboardChange { content: None })
            ),
            None
        );
    }

    #[test]
    fn focus_change_updates_shared_context() {
        let mut normalizer = Normalizer::new();
        let mut ctx = AppContext::default();

        let event = normalizer
            .normalize(RawInputEvent::focus(0, "EXCEL.EXE", "Book1"), &mut ctx)
            .expect("focus change");
        assert_eq!(event.category, EventCategory::FocusChanged);
        assert_eq!(ctx.app_name, "EXCEL.EXE");
        assert_eq!(ctx.window_title, "Book1");

        assert_eq!(
            run(&mut normalizer, &mut ctx, RawInputEvent::focus(5, "EXCEL.EXE", "Book1")),
            None
        );
        assert_eq!(run(&mut normalizer, &mut ctx, RawInputEvent::focus(6, "  ", "x")), None);

        let click = normalizer
            .normalize(RawInputEvent::mouse_down(9, "left", 1, 1), &mut ctx)
            .expect("click");
        assert_eq!(click.app_context, "EXCEL.EXE");
    }

    #[test]
    fn empty_key_names_are_malformed() {
        let mut normalizer = Normalizer::new();
        let mut ctx = AppContext::default();
        assert_eq!(run(&mut normalizer, &mut ctx, RawInputEvent::key_down(0, "   ")), None);
        assert_eq!(
            run(&mut normalizer, &mut ctx, RawInputEvent::key_down(1, "F5")),
            Some(EventCategory::KeyOther)
        );
    }
}
