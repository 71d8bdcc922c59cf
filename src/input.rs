/// Held-key model consumed by the simulation.
///
/// The front end owns event capture; the core only asks "is this key held".

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
}

impl InputKey {
    pub const ALL: [InputKey; 5] = [
        InputKey::ArrowUp,
        InputKey::ArrowDown,
        InputKey::ArrowLeft,
        InputKey::ArrowRight,
        InputKey::Enter,
    ];

    fn bit(self) -> u8 {
        match self {
            InputKey::ArrowUp => 1 << 0,
            InputKey::ArrowDown => 1 << 1,
            InputKey::ArrowLeft => 1 << 2,
            InputKey::ArrowRight => 1 << 3,
            InputKey::Enter => 1 << 4,
        }
    }
}

/// Snapshot of the keys held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys(u8);

impl HeldKeys {
    pub fn none() -> Self {
        Self(0)
    }

    pub fn press(&mut self, key: InputKey) {
        self.0 |= key.bit();
    }

    pub fn release(&mut self, key: InputKey) {
        self.0 &= !key.bit();
    }

    pub fn contains(&self, key: InputKey) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = InputKey> + '_ {
        InputKey::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl FromIterator<InputKey> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = InputKey>>(iter: I) -> Self {
        let mut keys = HeldKeys::none();
        for key in iter {
            keys.press(key);
        }
        keys
    }
}

impl<const N: usize> From<[InputKey; N]> for HeldKeys {
    fn from(keys: [InputKey; N]) -> Self {
        keys.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_are_independent_per_key() {
        let mut keys = HeldKeys::none();
        keys.press(InputKey::Enter);
        keys.press(InputKey::ArrowUp);
        keys.release(InputKey::ArrowUp);
        assert!(keys.contains(InputKey::Enter));
        assert!(!keys.contains(InputKey::ArrowUp));
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec![InputKey::Enter]);
    }

    #[test]
    fn pressing_twice_is_a_set_insert() {
        let keys = HeldKeys::from([InputKey::ArrowLeft, InputKey::ArrowLeft]);
        assert_eq!(keys.iter().count(), 1);
        assert!(!keys.is_empty());
    }
}
