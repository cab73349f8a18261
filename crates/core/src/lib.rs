//! Section Factory Core - Domain types and the section query engine.
//!
//! This crate provides the types shared by every Section Factory component:
//! - `api` - JSON HTTP API over the section catalog
//! - `cli` - Command-line tools for migrations, seeding, and users
//!
//! # Architecture
//!
//! The core crate contains only types, validation, and pure logic - no I/O,
//! no database access, no HTTP. The query engine in [`query`] evaluates a
//! filter over in-memory sections; storage backends either call it directly
//! or render the same semantics to SQL.
//!
//! # Modules
//!
//! - [`types`] - Sections, installations, users, ids, prices, validation
//! - [`query`] - Section filters, price buckets, pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod query;
pub mod types;

pub use query::{PageRequest, PriceBucket, PriceFilter, SectionFilter};
pub use types::*;
