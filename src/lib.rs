//! # hrportal-rs
//!
//! A Rust client library for the HR administration portal REST API:
//! session authentication backed by a bearer credential, employee profile
//! and salary lookup, leave-request submission and approval, employee
//! search, and HR-admin employee management.
//!
//! The crate has two cooperating cores. The [`SessionManager`] owns the
//! authentication credential: it acquires one via login, decodes the
//! embedded claims, persists the raw token, validates expiry on startup,
//! and exposes the derived [`Session`] flags used to gate manager and
//! HR-admin tooling. The leave request workflow
//! ([`entities::leave_request`]) models the lifecycle of a request from
//! `PENDING` through a manager decision.
//!
//! ```no_run
//! use hrportal_rs::{Client, MemoryCredentialStore, SessionManager};
//!
//! # async fn example() -> hrportal_rs::Result<()> {
//! let mut client = Client::new("http://portal.example.com:8000".parse().unwrap());
//! let mut sessions = SessionManager::new(MemoryCredentialStore::new());
//!
//! let session = sessions.login(&mut client, "admin00", "abc123").await?;
//!
//! let mine = client.leave_requests().list_mine(session.emp_no).await?;
//! println!("{} leave requests on file", mine.len());
//! # Ok(())
//! # }
//! ```
//!
//! All failures surface as a typed [`Error`]: local validation, rejected
//! login, missing authorization, transport failure, and undecodable
//! credentials are each distinct outcomes for the caller to render. Errors
//! raised from server responses capture a [`SpanTrace`] for use with
//! `tracing-error` subscribers.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod session;
pub mod utils;

pub use client::{Client, ChangePasswordMessage, TokenResponse};
pub use endpoints::PortalEndpoint;
pub use entities::*;
pub use error::{ApiErrorBody, Error, Result};
pub use session::{
    CREDENTIAL_KEY, Claims, CredentialStore, DecodeError, FileCredentialStore,
    MemoryCredentialStore, Session, SessionManager,
};

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;

// Re-export the last-request-wins gate for UI callers racing reads
pub use utils::sequence::{RequestSequence, Ticket};
