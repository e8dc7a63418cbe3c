//! Execution context handed to contracts by the host
//!
//! Everything a module learns about its environment (who called it, which
//! contract it runs as, what it may write) comes through this trait. There
//! is no ambient global state.

use crate::core::Address;

use super::error::{CallError, ModuleError};

/// Capability checked by [`ExecutionContext::check_authority`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorityKind {
    /// Permission to make contract calls on behalf of an account
    ContractCall,
}

/// Host services available during one contract invocation
pub trait ExecutionContext {
    /// Address of the contract currently executing
    fn current_contract_id(&self) -> Address;

    /// Immediate caller of the current contract
    fn caller(&self) -> Option<Address>;

    /// Caller of the immediate caller
    fn caller_of_caller(&self) -> Option<Address>;

    /// Whether `account` authorizes `kind` for the running transaction
    fn check_authority(&self, kind: AuthorityKind, account: &Address) -> bool;

    /// Call-dispatch primitive
    fn call(
        &mut self,
        contract_id: &Address,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, CallError>;

    /// Read an object owned by the current contract
    fn get_object(&self, space: u32, key: &[u8]) -> Option<Vec<u8>>;

    /// Write an object owned by the current contract
    fn put_object(&mut self, space: u32, key: &[u8], value: Vec<u8>) -> Result<(), ModuleError>;

    /// Append a line to the transaction log
    fn log(&mut self, message: &str);
}
