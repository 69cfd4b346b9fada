//! Business logic services.
//!
//! # Services
//!
//! - `registry` - Families and memberships
//! - `invites` - Single-use invites and their notifications
//! - `lists` - Weekly list lifecycle and items
//! - `join` - Joining a family by family or invite token
//! - `inbox` - Reading the notification inbox
//! - `auth` - Password authentication and bearer tokens
//!
//! Services borrow the pool from [`AppState`](crate::state::AppState) and
//! are cheap to construct per request.

pub mod auth;
mod error;
pub mod inbox;
pub mod invites;
pub mod join;
pub mod lists;
pub mod notifier;
pub mod registry;

pub use error::{ErrorKind, ServiceError};
pub use inbox::Inbox;
pub use invites::InviteIssuer;
pub use join::{JoinResolver, ResolvedToken};
pub use lists::ListService;
pub use notifier::{Notifier, NotifyError, PgNotifier};
pub use registry::FamilyRegistry;
