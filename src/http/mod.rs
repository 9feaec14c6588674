//! HTTP module
//!
//! Maps `reqwest` responses onto the crate's error taxonomy so callers can
//! build page and status fetchers over their own transport.
//!
//! # Features
//!
//! - **Throttling**: 429 becomes `Error::RateLimited` with the `Retry-After` hint
//! - **Error bodies**: `{errors: [...]}` bodies become `Error::Api`
//! - **Decoding**: JSON bodies decoded straight into catalogue shapes

mod response;

pub use response::{check_response, extract_retry_after, read_json, read_page};
