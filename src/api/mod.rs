//! REST API client module for the Research Tracker backend.
//!
//! This module provides the `ApiClient` for authentication, project,
//! milestone, and document operations.
//!
//! The API uses JWT bearer token authentication; the token is attached to
//! each outgoing request from the shared session store.

pub mod client;
pub mod error;

pub use client::{ApiClient, SignupRequest, SignupResponse};
pub use error::ApiError;
