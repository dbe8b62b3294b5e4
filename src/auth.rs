//! Identifiers, one-time secrets, PKCE challenges, and composite credential handles.

pub mod handle;
pub mod id;
pub mod pkce;
pub mod secret;

pub use handle::*;
pub use id::*;
pub use pkce::*;
pub use secret::*;
