//! The hat session
//!
//! [`HatSessionController`] ties the catalog, the preloaded prefabs, the menu
//! and the per-user attachment table together and reacts to session events.

use thiserror::Error;

pub mod attachments;
pub mod controller;
pub mod menu;

pub use attachments::{AttachmentTable, HatState, WornHat};
pub use controller::{HatSessionController, SessionPhase, UserStatus};
pub use menu::{build_menu, Menu, MenuEntry, MenuLayout};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session has already been started")]
    AlreadyStarted,

    #[error("Menu requested before hat models were preloaded")]
    NotPreloaded,

    #[error("Menu has already been built")]
    MenuAlreadyBuilt,
}

pub type SessionResult<T> = Result<T, SessionError>;
