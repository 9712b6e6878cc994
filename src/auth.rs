//! Token secrets and the mutable session they live in.

pub mod secret;
pub mod session;

pub use secret::*;
pub use session::*;
