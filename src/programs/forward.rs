//! Forward-only execution module
//!
//! Forwards every operation to its target with no filtering and keeps no
//! state. It is the plain revision of the execution-any module and shares
//! the forwarding path with it.

use tracing::debug;

use crate::core::{Address, Operation};
use crate::proto::{ExecuteArgs, Manifest, OnInstallArgs, Scope};
use crate::runtime::{dispatch_module, Contract, ExecutionContext, ExecutionModule, ModuleError};
use crate::MODULE_EXECUTION_TYPE_ID;

const LOG_PREFIX: &str = "[mod-execution-forward]";

/// Decode the operation carried by `execute` arguments
pub(crate) fn decode_operation(args: ExecuteArgs) -> Result<Operation, ModuleError> {
    let call = args
        .operation
        .ok_or_else(|| ModuleError::InvalidArguments("missing operation".to_string()))?;
    Operation::try_from(call).map_err(ModuleError::invalid_args)
}

/// Call the operation's target, aborting on any nonzero status
pub(crate) fn forward(
    ctx: &mut dyn ExecutionContext,
    contract_id: &Address,
    operation: &Operation,
) -> Result<Vec<u8>, ModuleError> {
    ctx.call(contract_id, operation.entry_point, &operation.args)
        .map_err(|e| {
            debug!("Forwarded call to {} failed with code {}", contract_id, e.code);
            ModuleError::DownstreamCallFailed {
                code: e.code,
                contract: *contract_id,
                message: e.message_or_unknown().to_string(),
            }
        })
}

/// Module that forwards everything
pub struct ForwardExecution;

impl ExecutionModule for ForwardExecution {
    fn manifest(&self) -> Manifest {
        Manifest {
            name: "Execution forward".to_string(),
            description: "Forward every operation without filtering".to_string(),
            type_id: MODULE_EXECUTION_TYPE_ID,
            version: "1.0.0".to_string(),
            scopes: vec![Scope::new(1)],
        }
    }

    fn execute(&self, ctx: &mut dyn ExecutionContext, args: ExecuteArgs) -> Result<(), ModuleError> {
        ctx.log(&format!("{} execute called", LOG_PREFIX));
        let operation = decode_operation(args)?;
        let contract_id = operation
            .contract_id
            .ok_or_else(|| ModuleError::InvalidArguments("missing contract id".to_string()))?;

        ctx.log(&format!("{} calling {}", LOG_PREFIX, operation.entry_point));
        forward(ctx, &contract_id, &operation)?;
        Ok(())
    }

    fn on_install(&self, ctx: &mut dyn ExecutionContext, _args: OnInstallArgs) -> Result<(), ModuleError> {
        ctx.log(&format!("{} called on_install", LOG_PREFIX));
        Ok(())
    }
}

impl Contract for ForwardExecution {
    fn invoke(
        &self,
        ctx: &mut dyn ExecutionContext,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, ModuleError> {
        dispatch_module(self, ctx, entry_point, args)
            .unwrap_or(Err(ModuleError::UnknownEntryPoint(entry_point)))
    }

    fn read_only(&self, entry_point: u32) -> bool {
        crate::proto::EntryPoint::from_id(entry_point).map_or(false, |ep| ep.read_only())
    }
}
