use serde::{Deserialize, Serialize};

/// One of the four cardinal moves. The discriminant is the fixed action
/// encoding used to index Q-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    pub const COUNT: usize = 4;

    /// All actions in encoding order.
    pub const ALL: [Action; Action::COUNT] =
        [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// Get action name for display
    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}
