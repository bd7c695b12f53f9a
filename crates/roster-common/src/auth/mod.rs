//! Session token utilities

mod session;

pub use session::{SessionClaims, SessionService};
