//! # mod-execution-any
//!
//! Skip-list execution module for account-abstraction hosts.
//!
//! An account installs the module and routes its operations through
//! `execute`. Every operation is forwarded to its target contract unless its
//! entry point is on the account's skip list, which only the owning account
//! can edit.
//!
//! ## Layout
//! - [`proto`] - protobuf messages and the entry-point ABI
//! - [`runtime`] - host interface, module traits and a local host
//! - [`storage`] - committed state, transaction overlay and typed records
//! - [`programs`] - the execution modules themselves
//! - [`config`] - host configuration

pub mod config;
pub mod core;
pub mod programs;
pub mod proto;
pub mod runtime;
pub mod storage;

// Re-exports
pub use crate::core::{Address, Operation};
pub use config::HostConfig;
pub use programs::{ExecutionAny, ForwardExecution};
pub use runtime::{
    CallError, Contract, ExecutionContext, ExecutionModule, Host, ModuleError, Receipt,
    Transaction,
};

/// Module type advertised in manifests (execution module)
pub const MODULE_EXECUTION_TYPE_ID: u32 = 1;

/// Version of the skip-list module
pub const MODULE_VERSION: &str = "2.0.0";
