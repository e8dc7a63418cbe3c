//! Protobuf messages and the entry point ABI of execution modules

pub mod abi;
pub mod messages;

pub use abi::{entry_point_id, EntryPoint};
pub use messages::{
    AccountId, AddSkipEntryPointArgs, CallOperation, ConfigStorage, EmptyResult, ExecuteArgs,
    GetSkipEntryPointsResult, Manifest, OnInstallArgs, RemoveSkipEntryPointArgs, Scope,
};
