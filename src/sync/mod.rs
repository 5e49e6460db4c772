pub mod driver;
pub mod engine;
pub mod roster;
pub mod sampling;
pub mod state;

pub use driver::ColorSyncDriver;
pub use engine::SyncEngine;
pub use roster::{Light, LightRoster};
pub use state::{SyncCommand, SyncConfig, SyncMode, TickOutcome};
