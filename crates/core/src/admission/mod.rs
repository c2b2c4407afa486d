//! Admission policy.
//!
//! Pre-flight gate for batch requests: every check here runs before any
//! ledger interaction, and everything it rejects is caller-correctable.

mod policy;

pub use policy::{AdmissionError, AdmissionPolicy, AdmittedRequest};
