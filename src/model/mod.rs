pub mod query;
pub mod session;
pub mod todo;
pub mod voter;
