use super::{User, UserId};
use crate::runtime::ActorId;

/// Events delivered by the session runtime, handled one at a time
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The session is up; fires once
    Started,
    UserJoined(User),
    UserLeft(UserId),
    /// A clickable actor was clicked
    ButtonClicked { actor: ActorId, user: UserId },
}
