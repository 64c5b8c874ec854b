//! Client-side console for a remote voter-management API.
//!
//! The server owns all persistence, validation and pagination; this crate
//! holds the typed HTTP clients ([`api`]), the domain model ([`model`])
//! and the interactive state machines behind each screen ([`view`]).
//! Authentication rides on a session cookie managed entirely by the HTTP
//! layer.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
