use crate::coords::Vec2;
use crate::event::{EventData, MouseButton};

/// Read-only pointer facts exposed to the canvas each frame.
#[derive(Debug, Copy, Clone, Default)]
pub struct PointerSnapshot {
    /// Pointer position in logical pixels, `None` once it left the window.
    pub pos: Option<Vec2>,
    /// True while the primary button is held.
    pub primary_down: bool,
    /// True when the primary button was released this frame.
    pub primary_clicked: bool,
}

/// Pointer tracking fed from the event stream during the drain step.
///
/// The runtime observes every event regardless of what the routing handlers
/// report; `primary_clicked` is a per-frame transition cleared after the frame
/// is consumed.
#[derive(Debug, Default)]
pub(crate) struct PointerState {
    pos: Option<Vec2>,
    primary_down: bool,
    clicked_this_frame: bool,
}

impl PointerState {
    pub fn observe(&mut self, data: &EventData) {
        match data {
            EventData::MouseMoved { x, y } => {
                self.pos = Some(Vec2::new(*x, *y));
            }
            EventData::MouseButtonPressed {
                button: MouseButton::Left,
            } => {
                self.primary_down = true;
            }
            EventData::MouseButtonReleased {
                button: MouseButton::Left,
            } => {
                if self.primary_down {
                    self.clicked_this_frame = true;
                }
                self.primary_down = false;
            }
            _ => {}
        }
    }

    pub fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot {
            pos: self.pos,
            primary_down: self.primary_down,
            primary_clicked: self.clicked_this_frame,
        }
    }

    /// Clears per-frame transitions after the frame is consumed.
    pub fn end_frame(&mut self) {
        self.clicked_this_frame = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_produces_one_click() {
        let mut p = PointerState::default();
        p.observe(&EventData::MouseButtonPressed {
            button: MouseButton::Left,
        });
        assert!(p.snapshot().primary_down);
        assert!(!p.snapshot().primary_clicked);

        p.observe(&EventData::MouseButtonReleased {
            button: MouseButton::Left,
        });
        assert!(!p.snapshot().primary_down);
        assert!(p.snapshot().primary_clicked);

        p.end_frame();
        assert!(!p.snapshot().primary_clicked);
    }

    #[test]
    fn release_without_press_is_not_a_click() {
        let mut p = PointerState::default();
        p.observe(&EventData::MouseButtonReleased {
            button: MouseButton::Left,
        });
        assert!(!p.snapshot().primary_clicked);
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut p = PointerState::default();
        p.observe(&EventData::MouseButtonPressed {
            button: MouseButton::Right,
        });
        assert!(!p.snapshot().primary_down);
    }

    #[test]
    fn moves_update_the_position() {
        let mut p = PointerState::default();
        p.observe(&EventData::MouseMoved { x: 12.0, y: 34.0 });
        assert_eq!(p.snapshot().pos, Some(Vec2::new(12.0, 34.0)));
    }
}
