//! Session state: who is logged in, with what role and token material

pub mod model;
pub mod store;

pub use model::{Role, Session};
pub use store::{SessionState, SessionStore};
