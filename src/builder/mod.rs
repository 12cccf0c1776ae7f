//! Builder API for constructing sessions.

pub mod error;
pub mod session;

pub use error::BuildError;
pub use session::SessionBuilder;
