//! Storage layer
//!
//! Committed state lives in a [`StateStore`] (memory, optionally backed by
//! sled). Running transactions write to a [`WriteSet`] that is committed as
//! a unit. Modules see their slots through typed [`Record`]s.

mod key;
mod overlay;
pub mod records;
mod state;

pub use key::ObjectKey;
pub use overlay::WriteSet;
pub use records::{Record, ACCOUNT_ID_SPACE_ID, CONFIG, CONFIG_SPACE_ID, OWNER};
pub use state::{StateStore, StorageError};
