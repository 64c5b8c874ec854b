//! Typed clients for the remote API. Each contract is a trait so the view
//! layer can be exercised against in-memory fakes; the `Http*` types are
//! the real JSON-over-HTTPS implementations.

pub mod auth;
pub mod todos;
pub mod voters;

pub use auth::{HttpSessionProvider, SessionProvider};
pub use todos::{HttpTodoStore, TodoStore};
pub use voters::{HttpVoterRegistry, VoterRegistry};
