/// Keys whose held state the camera samples every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackedKey {
    Forward,
    Left,
    Back,
    Right,
    Rise,
    Fall,
    LookUp,
    LookLeft,
    LookDown,
    LookRight,
}

impl TrackedKey {
    pub const ALL: [TrackedKey; 10] = [
        TrackedKey::Forward,
        TrackedKey::Left,
        TrackedKey::Back,
        TrackedKey::Right,
        TrackedKey::Rise,
        TrackedKey::Fall,
        TrackedKey::LookUp,
        TrackedKey::LookLeft,
        TrackedKey::LookDown,
        TrackedKey::LookRight,
    ];

    /// `w a s d` move, `r f` rise and fall, `i j k l` look.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "w" => TrackedKey::Forward,
            "a" => TrackedKey::Left,
            "s" => TrackedKey::Back,
            "d" => TrackedKey::Right,
            "r" => TrackedKey::Rise,
            "f" => TrackedKey::Fall,
            "i" => TrackedKey::LookUp,
            "j" => TrackedKey::LookLeft,
            "k" => TrackedKey::LookDown,
            "l" => TrackedKey::LookRight,
            _ => return None,
        })
    }
}

/// What a single key transition asks the camera to do.
///
/// The camera consumes actions, never raw key names, so any event source
/// (window system, script, test) drives it the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A tracked key went down.
    Press(TrackedKey),
    /// A tracked key went up.
    Release(TrackedKey),
    /// Freeze or unfreeze the view direction.
    ToggleLock,
    /// Abandon an in-progress focus turn.
    CancelFocus,
    /// Advance to the next focus target and start turning toward it.
    CycleFocus,
    /// Keys with no binding.
    Noop,
}

impl Action {
    /// Map a key name and its new state to an action. Toggles fire on press only.
    pub fn from_key(name: &str, pressed: bool) -> Self {
        if let Some(key) = TrackedKey::from_name(name) {
            return if pressed {
                Action::Press(key)
            } else {
                Action::Release(key)
            };
        }
        match (name, pressed) {
            ("c", true) => Action::ToggleLock,
            ("x", true) => Action::CancelFocus,
            ("v", true) => Action::CycleFocus,
            _ => Action::Noop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_are_tracked() {
        assert_eq!(Action::from_key("w", true), Action::Press(TrackedKey::Forward));
        assert_eq!(Action::from_key("f", false), Action::Release(TrackedKey::Fall));
        assert_eq!(Action::from_key("l", true), Action::Press(TrackedKey::LookRight));
    }

    #[test]
    fn toggles_fire_on_press_only() {
        assert_eq!(Action::from_key("c", true), Action::ToggleLock);
        assert_eq!(Action::from_key("c", false), Action::Noop);
        assert_eq!(Action::from_key("x", true), Action::CancelFocus);
        assert_eq!(Action::from_key("v", true), Action::CycleFocus);
    }

    #[test]
    fn unbound_keys_are_noop() {
        assert_eq!(Action::from_key("q", true), Action::Noop);
        assert_eq!(Action::from_key("W", true), Action::Noop);
    }

    #[test]
    fn every_tracked_key_has_a_name() {
        let names = ["w", "a", "s", "d", "r", "f", "i", "j", "k", "l"];
        for (name, key) in names.iter().zip(TrackedKey::ALL) {
            assert_eq!(TrackedKey::from_name(name), Some(key));
        }
    }
}
