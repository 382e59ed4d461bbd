mod client;
mod error;
mod light;
mod protocol;
mod session;
mod types;

pub use client::{LuxorClient, LuxorClientBuilder, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use light::{Light, LightCapability, ThemeButton, TurnOn};
pub use protocol::Framing;
pub use session::{ControllerSession, SessionRegistry, Snapshot, DEFAULT_POLL_INTERVAL};
pub use types::*;
