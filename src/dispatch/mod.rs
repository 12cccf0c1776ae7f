//! Input dispatch.
//!
//! Keys are mapped to typed [`Input`]s, and a [`Session`] turns each input
//! into a combined timeline and sound transition.

mod keys;
mod session;

pub use keys::{map_key, Focus, Input, InputTarget, KeyAction};
pub use session::{Command, Outcome, Session};
