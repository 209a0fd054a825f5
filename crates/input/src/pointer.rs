use glam::Vec2;

/// Pointer button, named after its conventional role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// A pointer event in container coordinates (logical pixels, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, position: Vec2 },
    Move { position: Vec2 },
    Up { button: PointerButton },
    /// Vertical wheel delta; positive scrolls down and zooms out.
    Wheel { delta_y: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_events_are_constructible() {
        let down = PointerEvent::Down {
            button: PointerButton::Primary,
            position: Vec2::new(10.0, 20.0),
        };
        assert!(matches!(down, PointerEvent::Down { button: PointerButton::Primary, .. }));
        assert!(matches!(PointerEvent::Wheel { delta_y: 1.0 }, PointerEvent::Wheel { .. }));
    }
}
