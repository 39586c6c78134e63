// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

use time::{Duration, OffsetDateTime};

use crate::model::Route;

/// How long a pending "g" waits for its second key.
pub const CHORD_TIMEOUT: Duration = Duration::milliseconds(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyPress {
    pub const fn plain(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub const fn ctrl(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            ctrl: true,
            alt: false,
            meta: false,
        }
    }

    pub const fn escape() -> Self {
        Self {
            key: Key::Escape,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    const fn has_modifier(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Whether keyboard focus sits in a text-entry surface. Editable focus
/// swallows everything except the two global escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusContext {
    Editable,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    OpenSearch,
    OpenHelp,
    Close,
    BlurField,
    Navigate(Route),
}

/// The two-key chord table: "g" then one of these letters.
pub fn chord_route(ch: char) -> Option<Route> {
    match ch {
        'd' => Some(Route::Dashboard),
        'c' => Some(Route::Contacts),
        'o' => Some(Route::Companies),
        'f' => Some(Route::Finder),
        'v' => Some(Route::Verifier),
        'b' => Some(Route::Billing),
        's' => Some(Route::Settings),
        'l' => Some(Route::Linkedin),
        'a' => Some(Route::AiChat),
        _ => None,
    }
}

/// Chord-recognition state. Owned by the host across renders; all
/// transitions run through [`ChordState::handle`], which takes the clock
/// as an argument so the timeout needs no timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChordState {
    pending_since: Option<OffsetDateTime>,
}

impl ChordState {
    pub const fn is_pending(self) -> bool {
        self.pending_since.is_some()
    }

    /// Translates one key-down event into at most one action. Returning
    /// `Some` means the key was consumed and the host must suppress the
    /// default behavior for it.
    pub fn handle(
        &mut self,
        press: KeyPress,
        focus: FocusContext,
        now: OffsetDateTime,
    ) -> Option<ShortcutAction> {
        // Global overrides fire from any state and leave chord state alone.
        if (press.ctrl || press.meta) && press.key == Key::Char('k') {
            return Some(ShortcutAction::OpenSearch);
        }
        if press.key == Key::Escape {
            return Some(match focus {
                FocusContext::Editable => ShortcutAction::BlurField,
                FocusContext::General => ShortcutAction::Close,
            });
        }

        // Everything else passes through to an editable target as text.
        if focus == FocusContext::Editable {
            return None;
        }

        // A stale chord is discarded before the key is interpreted, so the
        // press below is processed as if the state were idle.
        if let Some(since) = self.pending_since
            && now - since > CHORD_TIMEOUT
        {
            self.pending_since = None;
        }

        if self.pending_since.take().is_some() {
            if let Key::Char(ch) = press.key
                && !press.has_modifier()
            {
                // Unmapped chord keys drop silently.
                return chord_route(ch).map(ShortcutAction::Navigate);
            }
            return None;
        }

        match press.key {
            Key::Char('?') => Some(ShortcutAction::OpenHelp),
            Key::Char('g') if !press.has_modifier() => {
                self.pending_since = Some(now);
                None
            }
            _ => None,
        }
    }

    /// Callback-style boundary over [`handle`](Self::handle). Returns true
    /// when the key was consumed.
    pub fn dispatch<H: ShortcutHandler>(
        &mut self,
        press: KeyPress,
        focus: FocusContext,
        now: OffsetDateTime,
        handler: &mut H,
    ) -> bool {
        match self.handle(press, focus, now) {
            Some(ShortcutAction::OpenSearch) => handler.on_search(),
            Some(ShortcutAction::OpenHelp) => handler.on_open_help(),
            Some(ShortcutAction::Close) => handler.on_close(),
            Some(ShortcutAction::BlurField) => handler.on_blur(),
            Some(ShortcutAction::Navigate(route)) => handler.on_navigate(route),
            None => return false,
        }
        true
    }
}

pub trait ShortcutHandler {
    fn on_search(&mut self);
    fn on_open_help(&mut self);
    fn on_close(&mut self);
    fn on_navigate(&mut self, route: Route);

    /// Escape inside an editable field: the host owns the widget, so the
    /// core can only ask for the blur.
    fn on_blur(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::{ChordState, FocusContext, Key, KeyPress, ShortcutAction, ShortcutHandler};
    use crate::model::Route;
    use time::{Duration, OffsetDateTime};

    fn at(ms: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::milliseconds(ms)
    }

    #[test]
    fn chord_within_timeout_navigates() {
        let mut state = ChordState::default();
        assert_eq!(
            state.handle(KeyPress::plain('g'), FocusContext::General, at(0)),
            None
        );
        assert!(state.is_pending());
        assert_eq!(
            state.handle(KeyPress::plain('d'), FocusContext::General, at(900)),
            Some(ShortcutAction::Navigate(Route::Dashboard))
        );
        assert!(!state.is_pending());
    }

    #[test]
    fn stale_chord_is_discarded() {
        let mut state = ChordState::default();
        state.handle(KeyPress::plain('g'), FocusContext::General, at(0));
        // Past the window the "d" is an ordinary idle key and does nothing.
        assert_eq!(
            state.handle(KeyPress::plain('d'), FocusContext::General, at(1500)),
            None
        );
        assert!(!state.is_pending());
    }

    #[test]
    fn stale_g_rearms_the_chord() {
        let mut state = ChordState::default();
        state.handle(KeyPress::plain('g'), FocusContext::General, at(0));
        // A second "g" after the timeout is treated as a fresh chord start.
        assert_eq!(
            state.handle(KeyPress::plain('g'), FocusContext::General, at(2000)),
            None
        );
        assert!(state.is_pending());
        assert_eq!(
            state.handle(KeyPress::plain('c'), FocusContext::General, at(2500)),
            Some(ShortcutAction::Navigate(Route::Contacts))
        );
    }

    #[test]
    fn boundary_at_exactly_one_second_still_fires() {
        let mut state = ChordState::default();
        state.handle(KeyPress::plain('g'), FocusContext::General, at(0));
        assert_eq!(
            state.handle(KeyPress::plain('b'), FocusContext::General, at(1000)),
            Some(ShortcutAction::Navigate(Route::Billing))
        );
    }

    #[test]
    fn unmapped_chord_key_drops_silently_then_next_chord_works() {
        let mut state = ChordState::default();
        state.handle(KeyPress::plain('g'), FocusContext::General, at(0));
        assert_eq!(
            state.handle(KeyPress::plain('x'), FocusContext::General, at(500)),
            None
        );
        assert!(!state.is_pending());

        state.handle(KeyPress::plain('g'), FocusContext::General, at(600));
        assert_eq!(
            state.handle(KeyPress::plain('c'), FocusContext::General, at(900)),
            Some(ShortcutAction::Navigate(Route::Contacts))
        );
    }

    #[test]
    fn editable_focus_swallows_chords() {
        let mut state = ChordState::default();
        assert_eq!(
            state.handle(KeyPress::plain('g'), FocusContext::Editable, at(0)),
            None
        );
        assert!(!state.is_pending());
        assert_eq!(
            state.handle(KeyPress::plain('d'), FocusContext::Editable, at(100)),
            None
        );
    }

    #[test]
    fn escape_blurs_editable_without_closing() {
        let mut state = ChordState::default();
        assert_eq!(
            state.handle(KeyPress::escape(), FocusContext::Editable, at(0)),
            Some(ShortcutAction::BlurField)
        );
        assert_eq!(
            state.handle(KeyPress::escape(), FocusContext::General, at(10)),
            Some(ShortcutAction::Close)
        );
    }

    #[test]
    fn ctrl_k_fires_search_regardless_of_focus_and_chord_state() {
        let mut state = ChordState::default();
        assert_eq!(
            state.handle(KeyPress::ctrl('k'), FocusContext::Editable, at(0)),
            Some(ShortcutAction::OpenSearch)
        );

        state.handle(KeyPress::plain('g'), FocusContext::General, at(100));
        assert_eq!(
            state.handle(KeyPress::ctrl('k'), FocusContext::General, at(200)),
            Some(ShortcutAction::OpenSearch)
        );
        // The pending chord survives the override.
        assert!(state.is_pending());

        let meta_k = KeyPress {
            key: Key::Char('k'),
            ctrl: false,
            alt: false,
            meta: true,
        };
        assert_eq!(
            state.handle(meta_k, FocusContext::General, at(300)),
            Some(ShortcutAction::OpenSearch)
        );
    }

    #[test]
    fn question_mark_opens_help_only_outside_editable() {
        let mut state = ChordState::default();
        assert_eq!(
            state.handle(KeyPress::plain('?'), FocusContext::General, at(0)),
            Some(ShortcutAction::OpenHelp)
        );
        assert_eq!(
            state.handle(KeyPress::plain('?'), FocusContext::Editable, at(10)),
            None
        );
    }

    #[test]
    fn modified_second_key_drops_the_chord() {
        let mut state = ChordState::default();
        state.handle(KeyPress::plain('g'), FocusContext::General, at(0));
        assert_eq!(
            state.handle(KeyPress::ctrl('c'), FocusContext::General, at(200)),
            None
        );
        assert!(!state.is_pending());
    }

    #[test]
    fn chord_table_covers_every_route_letter() {
        let cases = [
            ('d', Route::Dashboard),
            ('c', Route::Contacts),
            ('o', Route::Companies),
            ('f', Route::Finder),
            ('v', Route::Verifier),
            ('b', Route::Billing),
            ('s', Route::Settings),
            ('l', Route::Linkedin),
            ('a', Route::AiChat),
        ];
        for (ch, route) in cases {
            assert_eq!(super::chord_route(ch), Some(route), "key {ch}");
        }
        assert_eq!(super::chord_route('z'), None);
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl ShortcutHandler for Recorder {
        fn on_search(&mut self) {
            self.calls.push("search".to_owned());
        }

        fn on_open_help(&mut self) {
            self.calls.push("help".to_owned());
        }

        fn on_close(&mut self) {
            self.calls.push("close".to_owned());
        }

        fn on_navigate(&mut self, route: Route) {
            self.calls.push(format!("nav {}", route.path()));
        }

        fn on_blur(&mut self) {
            self.calls.push("blur".to_owned());
        }
    }

    #[test]
    fn dispatch_invokes_exactly_one_callback() {
        let mut state = ChordState::default();
        let mut recorder = Recorder::default();

        assert!(!state.dispatch(
            KeyPress::plain('g'),
            FocusContext::General,
            at(0),
            &mut recorder
        ));
        assert!(state.dispatch(
            KeyPress::plain('c'),
            FocusContext::General,
            at(500),
            &mut recorder
        ));
        assert!(state.dispatch(
            KeyPress::escape(),
            FocusContext::Editable,
            at(600),
            &mut recorder
        ));
        assert_eq!(recorder.calls, vec!["nav /contacts", "blur"]);
    }
}
