//! Core types shared by the API client, the catalog view and the viewer

mod config;
mod error;
pub mod logging;
mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
