//! Data models shared by the stores, the local persistent store and the notification service.
//!
//! Field names serialize in camelCase so persisted documents and wire payloads stay
//! interchangeable with the web frontend.

mod identity;
mod notification;
mod settings;

pub use identity::*;
pub use notification::*;
pub use settings::*;
