pub mod input;
pub mod player;
pub mod session;
pub mod targets;
pub mod tasks;

pub use input::{InputEvent, MoveDirection};
pub use player::Player;
pub use session::{Session, aim_at};
pub use targets::{Target, TargetPool};
pub use tasks::{Task, TaskId, TaskQueue};
