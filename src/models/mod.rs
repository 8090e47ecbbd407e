//! Data models for the Glico Controle application.
//!
//! Field names follow the camelCase shape of the persisted document snapshot.

mod document;
mod glucose;
mod reminder;
mod summary;
mod task;
mod user;

pub use document::*;
pub use glucose::*;
pub use reminder::*;
pub use summary::*;
pub use task::*;
pub use user::*;
