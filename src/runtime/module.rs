//! Contract and execution module interfaces

use prost::Message;

use crate::proto::{EmptyResult, EntryPoint, ExecuteArgs, Manifest, OnInstallArgs};

use super::context::ExecutionContext;
use super::error::ModuleError;

/// Anything the host can call by address
pub trait Contract: Send + Sync {
    /// Handle one call
    fn invoke(
        &self,
        ctx: &mut dyn ExecutionContext,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, ModuleError>;

    /// Whether `entry_point` must run without writes
    fn read_only(&self, _entry_point: u32) -> bool {
        false
    }
}

/// Interface shared by every execution module variant
///
/// The host selects a variant at install time and only ever talks to it
/// through these three operations (plus whatever extra entry points the
/// variant exposes through [`Contract`]).
pub trait ExecutionModule: Send + Sync {
    fn manifest(&self) -> Manifest;

    fn execute(&self, ctx: &mut dyn ExecutionContext, args: ExecuteArgs) -> Result<(), ModuleError>;

    fn on_install(
        &self,
        ctx: &mut dyn ExecutionContext,
        args: OnInstallArgs,
    ) -> Result<(), ModuleError>;
}

/// Route the entry points every module shares
///
/// Returns `None` when `entry_point` is not one of them, leaving the caller
/// to handle variant-specific entry points.
pub fn dispatch_module<M: ExecutionModule + ?Sized>(
    module: &M,
    ctx: &mut dyn ExecutionContext,
    entry_point: u32,
    args: &[u8],
) -> Option<Result<Vec<u8>, ModuleError>> {
    let result = match EntryPoint::from_id(entry_point)? {
        EntryPoint::Manifest => Ok(module.manifest().encode_to_vec()),
        EntryPoint::Execute => ExecuteArgs::decode(args)
            .map_err(ModuleError::from)
            .and_then(|args| module.execute(ctx, args))
            .map(|()| EmptyResult {}.encode_to_vec()),
        EntryPoint::OnInstall => OnInstallArgs::decode(args)
            .map_err(ModuleError::from)
            .and_then(|args| module.on_install(ctx, args))
            .map(|()| EmptyResult {}.encode_to_vec()),
        _ => return None,
    };
    Some(result)
}
