//! Input-collaborator seam. The UI layer turns raw device events into
//! these commands and feeds them to the session.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Move(MoveDirection),
    Look { dx: f32, dy: f32 },
    Jump,
    SetRunning(bool),
    Shoot,
}
