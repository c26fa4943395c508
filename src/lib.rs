//! Job-board aggregator
//!
//! Fetches postings from several upstream job boards concurrently, merges
//! them into one deduplicated collection as each board answers, and derives
//! the displayed list from a free-text query, structured filters and a sort
//! option.
//!
//! - [`sources`]: upstream adapters and posting normalization
//! - [`aggregation`]: concurrent fan-out with incremental delivery
//! - [`pipeline`]: pure search, filter and sort stages
//! - [`board`]: the live state machine tying loads and view inputs together
//! - [`api`]: HTTP surface for the presentation layer

pub mod aggregation;
pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod sources;

pub use error::{AppError, Result};
