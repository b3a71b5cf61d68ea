//! # quill-model
//!
//! Domain models for the quill authentication core.
//!
//! This crate provides the read-mostly entity types consumed by the
//! authentication backend chain: realms (tenants), accounts, API
//! credentials, and the enumeration of authentication methods.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod account;
pub mod method;
pub mod realm;

pub use account::{Account, ApiKey};
pub use method::AuthMethod;
pub use realm::Realm;
