pub mod avatar;
pub mod events;

pub use avatar::{User, UserId};
pub use events::SessionEvent;
