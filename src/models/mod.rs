//! Data models for the Student Council portal.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod member;
mod role;

pub use member::*;
pub use role::*;
