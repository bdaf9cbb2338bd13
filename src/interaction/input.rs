//! Device-independent input state for one frame.

use std::collections::HashSet;

/// Keys the simulator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Q,
    W,
    E,
    A,
    S,
    D,
    Z,
    X,
    C,
    /// Terrain alpha modifier.
    T,
    Up,
    Down,
    Shift,
    /// Clear the field.
    Space,
    /// Randomize the field.
    R,
    /// Randomize the kernel.
    K,
    /// Next activation.
    Tab,
    /// Previous activation.
    Backquote,
    /// Preset slot 0-9.
    Digit(u8),
}

/// Kernel cell keys laid out like the 3x3 matrix on a QWERTY keyboard.
pub const CELL_KEYS: [(Key, (usize, usize)); 9] = [
    (Key::Q, (0, 0)),
    (Key::W, (0, 1)),
    (Key::E, (0, 2)),
    (Key::A, (1, 0)),
    (Key::S, (1, 1)),
    (Key::D, (1, 2)),
    (Key::Z, (2, 0)),
    (Key::X, (2, 1)),
    (Key::C, (2, 2)),
];

/// Input gathered by the platform layer for one frame.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Keys currently held down.
    pub held: HashSet<Key>,
    /// Key-down events since the previous frame, in order.
    pub pressed: Vec<Key>,
    /// Pointer position in screen pixels.
    pub pointer: (i32, i32),
    /// Primary pointer button held.
    pub pointer_down: bool,
}

impl InputSnapshot {
    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Builder-style helper: mark keys as held.
    pub fn holding(mut self, keys: &[Key]) -> Self {
        self.held.extend(keys.iter().copied());
        self
    }

    /// Builder-style helper: add key-down events.
    pub fn pressing(mut self, keys: &[Key]) -> Self {
        self.pressed.extend_from_slice(keys);
        self
    }

    /// Builder-style helper: pointer held at a position.
    pub fn dragging(mut self, x: i32, y: i32) -> Self {
        self.pointer = (x, y);
        self.pointer_down = true;
        self
    }
}
