pub mod client;
pub mod sink;
pub mod types;

pub use client::HassClient;
pub use sink::LightSink;
pub use types::{Endpoint, TurnOffPayload, TurnOnPayload};
