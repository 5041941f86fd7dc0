pub mod adapter;
pub mod config;
pub mod credential;
pub mod error;
pub mod markers;
pub mod placeholder;
pub mod provider;
pub mod recording;
pub mod symbology;

pub use adapter::*;
pub use config::*;
pub use credential::*;
pub use error::*;
pub use placeholder::*;
pub use provider::*;
