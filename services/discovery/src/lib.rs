//! Discovery service internals.
//!
//! The pipeline, in dependency order: [`client`] talks to the orchestration
//! API, [`discovery`] enumerates clusters and fully describes their tasks,
//! [`extract`] turns task records into scrape targets, [`persistence`]
//! publishes them atomically, and [`poll`] drives one cycle per interval.

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod persistence;
pub mod poll;

pub use error::DiscoveryError;
