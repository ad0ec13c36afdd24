use bitflags::bitflags;

use super::{Key, MouseButton};

bitflags! {
    /// Coarse routing tags attached to every event kind.
    ///
    /// Categories are advisory: routing uses them to skip handler groups that
    /// cannot match, while the dispatch itself compares exact kinds.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct EventCategory: u32 {
        const APPLICATION  = 1 << 0;
        const INPUT        = 1 << 1;
        const KEYBOARD     = 1 << 2;
        const MOUSE        = 1 << 3;
        const MOUSE_BUTTON = 1 << 4;
    }
}

/// Fieldless mirror of the [`EventData`] variants, used for dispatch matching.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    WindowResize,
    WindowClose,
    KeyPressed,
    KeyReleased,
    KeyTyped,
    MouseMoved,
    MouseScrolled,
    MouseButtonPressed,
    MouseButtonReleased,
}

impl EventKind {
    /// Category bitmask for this kind.
    ///
    /// Fixed per kind and independent of any payload.
    pub const fn categories(self) -> EventCategory {
        match self {
            EventKind::WindowResize | EventKind::WindowClose => EventCategory::APPLICATION,

            EventKind::KeyPressed | EventKind::KeyReleased => EventCategory::KEYBOARD,

            EventKind::KeyTyped => EventCategory::KEYBOARD.union(EventCategory::INPUT),

            EventKind::MouseMoved | EventKind::MouseScrolled => {
                EventCategory::MOUSE.union(EventCategory::INPUT)
            }

            EventKind::MouseButtonPressed | EventKind::MouseButtonReleased => EventCategory::MOUSE
                .union(EventCategory::INPUT)
                .union(EventCategory::MOUSE_BUTTON),
        }
    }
}

/// Payload of one discrete input or window occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    WindowResize { width: u32, height: u32 },
    WindowClose,

    KeyPressed { key: Key, repeat: bool },
    KeyReleased { key: Key },
    KeyTyped { ch: char },

    MouseMoved { x: f32, y: f32 },
    MouseScrolled { dx: f32, dy: f32 },
    MouseButtonPressed { button: MouseButton },
    MouseButtonReleased { button: MouseButton },
}

impl EventData {
    pub const fn kind(&self) -> EventKind {
        match self {
            EventData::WindowResize { .. } => EventKind::WindowResize,
            EventData::WindowClose => EventKind::WindowClose,
            EventData::KeyPressed { .. } => EventKind::KeyPressed,
            EventData::KeyReleased { .. } => EventKind::KeyReleased,
            EventData::KeyTyped { .. } => EventKind::KeyTyped,
            EventData::MouseMoved { .. } => EventKind::MouseMoved,
            EventData::MouseScrolled { .. } => EventKind::MouseScrolled,
            EventData::MouseButtonPressed { .. } => EventKind::MouseButtonPressed,
            EventData::MouseButtonReleased { .. } => EventKind::MouseButtonReleased,
        }
    }
}

/// One queued occurrence: immutable payload plus a mutable handled flag.
///
/// The handled flag accumulates handler results as a cumulative OR over the
/// event's lifetime; it is never reset mid-dispatch and no dispatch step
/// consults it to short-circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    data: EventData,
    handled: bool,
}

impl Event {
    pub fn new(data: EventData) -> Self {
        Self {
            data,
            handled: false,
        }
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }

    pub fn categories(&self) -> EventCategory {
        self.data.kind().categories()
    }

    pub fn in_category(&self, category: EventCategory) -> bool {
        self.categories().intersects(category)
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Offers this event to `handler` iff its runtime kind equals `kind`.
    ///
    /// On match the handler runs, its boolean result is OR-ed into the handled
    /// flag, and `true` is reported. On mismatch the event is left untouched
    /// and `false` is reported.
    pub fn dispatch<F>(&mut self, kind: EventKind, handler: F) -> bool
    where
        F: FnOnce(&EventData) -> bool,
    {
        if self.data.kind() != kind {
            return false;
        }

        self.handled |= handler(&self.data);
        true
    }
}

impl From<EventData> for Event {
    fn from(data: EventData) -> Self {
        Event::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resize() -> Event {
        Event::new(EventData::WindowResize {
            width: 800,
            height: 600,
        })
    }

    // ── dispatch ──────────────────────────────────────────────────────────

    #[test]
    fn dispatch_matches_on_exact_kind() {
        let mut e = resize();
        let matched = e.dispatch(EventKind::WindowResize, |_| true);
        assert!(matched);
        assert!(e.is_handled());
    }

    #[test]
    fn dispatch_mismatch_leaves_event_untouched() {
        let mut e = resize();
        let matched = e.dispatch(EventKind::WindowClose, |_| true);
        assert!(!matched);
        assert!(!e.is_handled());
    }

    #[test]
    fn dispatch_mismatch_never_runs_handler() {
        let mut e = resize();
        let mut ran = false;
        e.dispatch(EventKind::KeyTyped, |_| {
            ran = true;
            true
        });
        assert!(!ran);
    }

    #[test]
    fn handled_flag_accumulates_as_or() {
        let mut e = resize();

        e.dispatch(EventKind::WindowResize, |_| false);
        assert!(!e.is_handled());

        e.dispatch(EventKind::WindowResize, |_| true);
        assert!(e.is_handled());

        // Once true it stays true even when later handlers report false.
        e.dispatch(EventKind::WindowResize, |_| false);
        assert!(e.is_handled());
    }

    #[test]
    fn handled_event_is_still_offered_to_later_handlers() {
        let mut e = resize();
        e.dispatch(EventKind::WindowResize, |_| true);

        let mut ran = false;
        e.dispatch(EventKind::WindowResize, |_| {
            ran = true;
            false
        });
        assert!(ran);
    }

    #[test]
    fn handler_sees_the_payload() {
        let mut e = resize();
        e.dispatch(EventKind::WindowResize, |data| {
            assert_eq!(
                data,
                &EventData::WindowResize {
                    width: 800,
                    height: 600
                }
            );
            true
        });
    }

    // ── categories ────────────────────────────────────────────────────────

    #[test]
    fn category_table_is_fixed_per_kind() {
        use EventCategory as C;

        assert_eq!(EventKind::WindowResize.categories(), C::APPLICATION);
        assert_eq!(EventKind::WindowClose.categories(), C::APPLICATION);

        assert_eq!(EventKind::KeyPressed.categories(), C::KEYBOARD);
        assert_eq!(EventKind::KeyReleased.categories(), C::KEYBOARD);
        assert_eq!(EventKind::KeyTyped.categories(), C::KEYBOARD | C::INPUT);

        assert_eq!(EventKind::MouseMoved.categories(), C::MOUSE | C::INPUT);
        assert_eq!(EventKind::MouseScrolled.categories(), C::MOUSE | C::INPUT);

        let button = C::MOUSE | C::INPUT | C::MOUSE_BUTTON;
        assert_eq!(EventKind::MouseButtonPressed.categories(), button);
        assert_eq!(EventKind::MouseButtonReleased.categories(), button);
    }

    #[test]
    fn categories_are_independent_of_payload() {
        let a = Event::new(EventData::KeyPressed {
            key: Key::A,
            repeat: false,
        });
        let b = Event::new(EventData::KeyPressed {
            key: Key::F12,
            repeat: true,
        });
        assert_eq!(a.categories(), b.categories());
    }

    #[test]
    fn in_category_tests_intersection() {
        let e = Event::new(EventData::MouseButtonPressed {
            button: MouseButton::Left,
        });
        assert!(e.in_category(EventCategory::MOUSE));
        assert!(e.in_category(EventCategory::MOUSE_BUTTON));
        assert!(e.in_category(EventCategory::INPUT));
        assert!(!e.in_category(EventCategory::APPLICATION));
        assert!(!e.in_category(EventCategory::KEYBOARD));
    }
}
