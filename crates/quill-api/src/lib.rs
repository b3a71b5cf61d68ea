//! # quill-api
//!
//! Typed external surface for the quill authentication core:
//! `fetch_api_key`, `dev_fetch_api_key`, `dev_get_emails`, and
//! `get_auth_backends` as operations producing serializable envelopes
//! with stable messages.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod endpoints;
pub mod response;

pub use endpoints::AuthApi;
pub use response::{
    ApiError, AuthBackendsResponse, DevEmailsResponse, DevFetchApiKeyResponse, ErrorEnvelope,
    FetchApiKeyResponse,
};
