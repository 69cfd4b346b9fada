//! Shopping Planner Core - Shared domain types.
//!
//! This crate provides the types used across all Shopping Planner components:
//! - `server` - JSON API over the weekly list and membership services
//! - `cli` - Command-line tools for migrations and headless operation
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Week window arithmetic, join-code generation and the
//! identity claim live here so they can be tested without a database.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, emails, roles, statuses, join codes, week windows and claims

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
