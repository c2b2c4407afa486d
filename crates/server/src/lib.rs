//! HTTP server for the gumball batch acquisition service.

pub mod api;
pub mod metrics;
pub mod state;
