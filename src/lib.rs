//! Cat-in-the-middle token authority - PKCE authorization codes, rotating refresh tokens, and
//! RS256 access-token minting over pluggable session stores.
//!
//! A user authenticates once against an external identity provider; this crate then issues its
//! own short-lived, resource-scoped access tokens and long-lived refresh tokens to client
//! applications through an authorization-code-with-PKCE handshake. The web UI, upstream login
//! flows, and HTTP framework plumbing are the host's concern; the [`grants::Broker`] only needs
//! a verified identity, a [`store::SessionStore`], and an RS256 signing key.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod grants;
pub mod jwt;
pub mod obs;
pub mod resource;
pub mod session;
pub mod store;

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use jsonwebtoken;
pub use url;
#[cfg(test)] use tokio as _;
