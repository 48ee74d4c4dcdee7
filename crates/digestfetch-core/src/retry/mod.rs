//! Caller-side retry for fetches.
//!
//! [`crate::fetch`] never retries on its own. Provisioning code that wants
//! to ride out flaky mirrors wraps it with [`fetch_with_retry`]; checksum
//! mismatches and cancellation stop immediately.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::fetch_with_retry;
