//! Core types for the shopping planner.
//!
//! This module provides type-safe wrappers for the domain concepts.

pub mod claim;
pub mod email;
pub mod id;
pub mod status;
pub mod token;
pub mod week;

pub use claim::{Affiliation, IdentityClaim};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
pub use token::{JoinCode, RandomTokens, TokenGenerator, TokenKind};
pub use week::{RolloverDay, RolloverDayError, WeekWindow, parse_weekday, weekday_name};
