//! Runtime-level event handlers and the fixed routing table.

use crate::event::{Event, EventCategory, EventData, EventKind};

use super::AppSpec;

fn on_key_pressed(_: &EventData) -> bool {
    true
}

fn on_key_released(_: &EventData) -> bool {
    true
}

fn on_key_typed(_: &EventData) -> bool {
    true
}

fn on_mouse_moved(_: &EventData) -> bool {
    true
}

fn on_mouse_scrolled(_: &EventData) -> bool {
    true
}

fn on_mouse_button_pressed(_: &EventData) -> bool {
    true
}

fn on_mouse_button_released(_: &EventData) -> bool {
    true
}

/// Routes one drained event through the runtime's handlers.
///
/// Dispatch attempts are grouped by category to skip irrelevant kinds; the
/// exact-kind match inside [`Event::dispatch`] decides what actually runs.
/// The resize handler updates the stored specs and reports the event as not
/// fully handled so other layers may still inspect it; the close handler
/// clears the running flag and accepts the event.
pub(crate) fn route_event(spec: &mut AppSpec, running: &mut bool, event: &mut Event) {
    use EventCategory as C;
    use EventKind as K;

    if event.in_category(C::MOUSE_BUTTON) {
        event.dispatch(K::MouseButtonPressed, on_mouse_button_pressed);
        event.dispatch(K::MouseButtonReleased, on_mouse_button_released);
    } else if event.in_category(C::MOUSE) {
        event.dispatch(K::MouseMoved, on_mouse_moved);
        event.dispatch(K::MouseScrolled, on_mouse_scrolled);
    }

    if event.in_category(C::INPUT) {
        event.dispatch(K::KeyTyped, on_key_typed);
    }

    if event.in_category(C::APPLICATION) {
        event.dispatch(K::WindowClose, |_| {
            *running = false;
            true
        });
        event.dispatch(K::WindowResize, |data| {
            if let EventData::WindowResize { width, height } = data {
                spec.width = *width;
                spec.height = *height;
            }
            false
        });
    }

    if event.in_category(C::KEYBOARD) {
        event.dispatch(K::KeyPressed, on_key_pressed);
        event.dispatch(K::KeyReleased, on_key_released);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppFlags;
    use crate::event::{Key, MouseButton};

    fn spec() -> AppSpec {
        AppSpec::new("Demo", 640, 480, AppFlags::empty())
    }

    fn route(data: EventData) -> (AppSpec, bool, Event) {
        let mut spec = spec();
        let mut running = true;
        let mut event = Event::new(data);
        route_event(&mut spec, &mut running, &mut event);
        (spec, running, event)
    }

    #[test]
    fn resize_updates_specs_but_stays_unhandled() {
        let (spec, running, event) = route(EventData::WindowResize {
            width: 800,
            height: 600,
        });

        assert_eq!((spec.width, spec.height), (800, 600));
        assert!(running);
        assert!(!event.is_handled());
    }

    #[test]
    fn close_clears_the_running_flag_and_is_handled() {
        let (spec, running, event) = route(EventData::WindowClose);

        assert!(!running);
        assert!(event.is_handled());
        assert_eq!((spec.width, spec.height), (640, 480));
    }

    #[test]
    fn input_events_are_accepted_without_side_effects() {
        let inputs = [
            EventData::KeyPressed {
                key: Key::A,
                repeat: false,
            },
            EventData::KeyReleased { key: Key::A },
            EventData::KeyTyped { ch: 'a' },
            EventData::MouseMoved { x: 1.0, y: 2.0 },
            EventData::MouseScrolled { dx: 0.0, dy: -1.0 },
            EventData::MouseButtonPressed {
                button: MouseButton::Left,
            },
            EventData::MouseButtonReleased {
                button: MouseButton::Left,
            },
        ];

        for data in inputs {
            let (spec, running, event) = route(data);
            assert!(event.is_handled(), "{:?}", event.kind());
            assert!(running);
            assert_eq!((spec.width, spec.height), (640, 480));
        }
    }

    #[test]
    fn every_kind_survives_the_routing_pass() {
        // The full table: routing an event of any kind must terminate without
        // touching unrelated state.
        let all = [
            EventData::WindowResize {
                width: 1,
                height: 1,
            },
            EventData::WindowClose,
            EventData::KeyPressed {
                key: Key::Escape,
                repeat: true,
            },
            EventData::KeyReleased { key: Key::Escape },
            EventData::KeyTyped { ch: 'x' },
            EventData::MouseMoved { x: 0.0, y: 0.0 },
            EventData::MouseScrolled { dx: 1.0, dy: 0.0 },
            EventData::MouseButtonPressed {
                button: MouseButton::Other(7),
            },
            EventData::MouseButtonReleased {
                button: MouseButton::Other(7),
            },
        ];

        for data in all {
            let _ = route(data);
        }
    }
}
