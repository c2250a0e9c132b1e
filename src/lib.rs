//! # pollsite
//!
//! A minimal poll site served by a from-scratch async HTTP/1.1 server.
//!
//! The crate is split into a small framework core — [`http`] protocol types,
//! a [`server`] accept loop, a [`router`] with typed URL patterns, and a
//! per-request [`context`] — and the application built on top of it: the
//! [`polls`] and [`devtest`] apps, composed into one routing table by [`site`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pollsite::server::Server;
//! use pollsite::site;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = site::router()?;
//!     let server = Server::bind("127.0.0.1:8000").await?;
//!     println!("Listening on http://127.0.0.1:8000");
//!     server.serve(router).await?;
//!     Ok(())
//! }
//! ```

// ── Framework core ────────────────────────────────────────────────────────────
pub mod context;
pub mod http;
pub mod router;
pub mod server;

// ── Applications ──────────────────────────────────────────────────────────────
pub mod devtest;
pub mod polls;
pub mod site;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use context::{Context, PathParams};
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::{RouteError, RouteTable, Router};
pub use server::{Server, ServerError};
