//! Shopping Planner server library.
//!
//! JSON API for a family's shared weekly shopping list. Users register,
//! form a family, invite others and maintain one active list per family
//! that is archived on the configured rollover day.
//!
//! The library form lets the CLI and the integration tests drive the
//! same services and router the binary serves.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
