//! Data models for the landing page backend.
//!
//! View-model types serialize in camelCase for the admin UI; storage rows keep
//! the persisted snake_case names.

mod business;
mod record;
mod session;
mod template;

pub use business::*;
pub use record::*;
pub use session::*;
pub use template::*;
