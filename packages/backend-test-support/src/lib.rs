//! Test helpers shared by the scistats integration suites.
//!
//! Nothing here depends on backend types, so the helpers can assert on the
//! wire contract exactly as a client would see it.

pub mod error_body;
pub mod logging;
pub mod unique;

pub use error_body::{assert_error_body, ErrorBodyLike};
pub use unique::{unique_guid, unique_name};
