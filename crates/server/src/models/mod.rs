//! Domain models returned by the repositories and services.

pub mod family;
pub mod invite;
pub mod list;
pub mod notification;
pub mod user;

pub use family::{Family, Member, Membership};
pub use invite::Invite;
pub use list::{ArchivedItems, CurrentList, Item, ItemWithAuthor, List};
pub use notification::Notification;
pub use user::User;
