//! Runtime - host context, contract interfaces and the local host
//!
//! Modules never reach for ambient state: the host hands every invocation an
//! [`ExecutionContext`] carrying caller identity, authority checks, the
//! call-dispatch primitive and storage.

mod context;
mod error;
mod host;
mod module;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{AuthorityKind, ExecutionContext};
pub use error::{CallError, ModuleError, FAILURE_CODE, HOST_FAILURE_CODE, UNKNOWN_ERROR};
pub use host::{Host, HostError, Receipt, Transaction};
pub use module::{dispatch_module, Contract, ExecutionModule};
