//! Client SDK for the Lampus campus platform.
//!
//! Owns the client side of authentication: the HTTP transport to the remote
//! auth/user service, the session state machine that tracks whether the caller
//! is logged in, and the route-guard decision gating protected views. Network
//! transport details below the HTTP client and all UI rendering live outside
//! this crate.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod identity;
pub mod session;
pub mod token;
