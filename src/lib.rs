// wear-a-hat: pick a hat from a menu, wear it on your avatar's head
// One controller per session, driven by runtime events

pub mod utils;
pub mod config;
pub mod catalog;
pub mod assets;
pub mod runtime;
pub mod world;
pub mod session;

// Re-export commonly used types for convenience
pub use catalog::{HatCatalog, HatDescriptor, HatId, HatTransform};
pub use config::AppSettings;
pub use runtime::{HeadlessRuntime, SessionRuntime};
pub use session::{HatSessionController, HatState};
pub use world::{SessionEvent, User, UserId};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
