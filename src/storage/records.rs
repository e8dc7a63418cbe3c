//! Typed access to the records a module persists

use std::marker::PhantomData;

use prost::Message;

use crate::proto::{AccountId, ConfigStorage};
use crate::runtime::{ExecutionContext, ModuleError};

/// Space holding the skip-list configuration
pub const CONFIG_SPACE_ID: u32 = 0;

/// Space holding the owner identity
pub const ACCOUNT_ID_SPACE_ID: u32 = 1;

/// One protobuf record stored under the current contract
///
/// The object key is the contract's own address, so each module instance
/// has exactly one record per space.
pub struct Record<T> {
    space: u32,
    _marker: PhantomData<T>,
}

impl<T> Record<T> {
    pub const fn new(space: u32) -> Self {
        Self {
            space,
            _marker: PhantomData,
        }
    }
}

impl<T: Message + Default> Record<T> {
    /// Load the record, `None` when it was never written
    pub fn get(&self, ctx: &dyn ExecutionContext) -> Result<Option<T>, ModuleError> {
        let key = ctx.current_contract_id();
        match ctx.get_object(self.space, key.as_bytes()) {
            Some(bytes) => T::decode(bytes.as_slice())
                .map(Some)
                .map_err(|e| ModuleError::CorruptRecord {
                    space: self.space,
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub fn put(&self, ctx: &mut dyn ExecutionContext, value: &T) -> Result<(), ModuleError> {
        let key = ctx.current_contract_id();
        ctx.put_object(self.space, key.as_bytes(), value.encode_to_vec())
    }
}

/// Skip-list configuration record
pub const CONFIG: Record<ConfigStorage> = Record::new(CONFIG_SPACE_ID);

/// Owner identity record
pub const OWNER: Record<AccountId> = Record::new(ACCOUNT_ID_SPACE_ID);
