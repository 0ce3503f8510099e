//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod council;

pub use council::*;
