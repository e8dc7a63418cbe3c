//! Execution-any module - forwards operations unless their entry point is
//! on the owner's skip list
//!
//! State (both records keyed by the module's own address):
//! - skip-list config, space 0
//! - owner identity captured at install, space 1
//!
//! Only the owner may change the skip list. Skipped operations return
//! normally; the skip is visible only in the transaction log.

use prost::Message;
use tracing::{debug, warn};

use crate::core::Address;
use crate::proto::{
    AccountId, AddSkipEntryPointArgs, ConfigStorage, EmptyResult, EntryPoint, ExecuteArgs,
    GetSkipEntryPointsResult, Manifest, OnInstallArgs, RemoveSkipEntryPointArgs, Scope,
};
use crate::runtime::{
    dispatch_module, AuthorityKind, Contract, ExecutionContext, ExecutionModule, ModuleError,
};
use crate::storage::{ACCOUNT_ID_SPACE_ID, CONFIG, OWNER};
use crate::{MODULE_EXECUTION_TYPE_ID, MODULE_VERSION};

use super::forward::{decode_operation, forward};

/// Prefix of every log line this module emits
pub const LOG_PREFIX: &str = "[mod-execution-any]";

/// Skip-list execution module
pub struct ExecutionAny;

impl ExecutionAny {
    /// Add an entry point to the skip list (owner only, idempotent)
    pub fn add_skip_entry_point(
        &self,
        ctx: &mut dyn ExecutionContext,
        args: AddSkipEntryPointArgs,
    ) -> Result<(), ModuleError> {
        self.require_owner(ctx)?;

        let entry_point = args.entry_point;
        let mut config = CONFIG.get(&*ctx)?.unwrap_or_default();
        if config.skip_entry_points.contains(&entry_point) {
            ctx.log(&format!("{} entry point {} already skipped", LOG_PREFIX, entry_point));
            return Ok(());
        }

        config.skip_entry_points.push(entry_point);
        CONFIG.put(ctx, &config)?;
        ctx.log(&format!("{} added skip entry point {}", LOG_PREFIX, entry_point));
        debug!("Skip list holds {} entry points", config.skip_entry_points.len());
        Ok(())
    }

    /// Remove every occurrence of an entry point from the skip list (owner only)
    pub fn remove_skip_entry_point(
        &self,
        ctx: &mut dyn ExecutionContext,
        args: RemoveSkipEntryPointArgs,
    ) -> Result<(), ModuleError> {
        self.require_owner(ctx)?;

        let entry_point = args.entry_point;
        let mut config = CONFIG.get(&*ctx)?.ok_or(ModuleError::ConfigNotFound)?;
        config.skip_entry_points.retain(|ep| *ep != entry_point);

        CONFIG.put(ctx, &config)?;
        ctx.log(&format!("{} removed skip entry point {}", LOG_PREFIX, entry_point));
        Ok(())
    }

    /// Current skip list; fails when no config was ever written
    pub fn get_skip_entry_points(
        &self,
        ctx: &dyn ExecutionContext,
    ) -> Result<GetSkipEntryPointsResult, ModuleError> {
        let config = CONFIG.get(ctx)?.ok_or(ModuleError::ConfigNotFound)?;
        Ok(GetSkipEntryPointsResult {
            value: config.skip_entry_points,
        })
    }

    /// Owner identity captured at install
    pub fn get_account_id(&self, ctx: &dyn ExecutionContext) -> Result<AccountId, ModuleError> {
        OWNER.get(ctx)?.ok_or(ModuleError::NotInstalled)
    }

    fn owner(&self, ctx: &dyn ExecutionContext) -> Result<Address, ModuleError> {
        let record = self.get_account_id(ctx)?;
        Address::from_slice(&record.value).map_err(|e| ModuleError::CorruptRecord {
            space: ACCOUNT_ID_SPACE_ID,
            reason: e.to_string(),
        })
    }

    fn require_owner(&self, ctx: &mut dyn ExecutionContext) -> Result<Address, ModuleError> {
        let owner = self.owner(&*ctx)?;
        if !ctx.check_authority(AuthorityKind::ContractCall, &owner) {
            warn!("Rejected skip list change: {} did not authorize", owner);
            ctx.log(&format!("{} not authorized", LOG_PREFIX));
            return Err(ModuleError::NotAuthorized);
        }
        Ok(owner)
    }

    /// Skip list as seen by `execute`; a missing config means nothing is skipped
    fn skip_list(ctx: &dyn ExecutionContext) -> Result<Vec<u32>, ModuleError> {
        Ok(CONFIG
            .get(ctx)?
            .map(|config| config.skip_entry_points)
            .unwrap_or_default())
    }
}

impl ExecutionModule for ExecutionAny {
    fn manifest(&self) -> Manifest {
        Manifest {
            name: "Execution any".to_string(),
            description: "Execute any operation".to_string(),
            type_id: MODULE_EXECUTION_TYPE_ID,
            version: MODULE_VERSION.to_string(),
            scopes: vec![Scope::new(1)],
        }
    }

    fn execute(&self, ctx: &mut dyn ExecutionContext, args: ExecuteArgs) -> Result<(), ModuleError> {
        ctx.log(&format!("{} execute called", LOG_PREFIX));
        let operation = decode_operation(args)?;

        if Self::skip_list(&*ctx)?.contains(&operation.entry_point) {
            ctx.log(&format!("{} skip {}", LOG_PREFIX, operation.entry_point));
            return Ok(());
        }

        let contract_id = operation
            .contract_id
            .ok_or_else(|| ModuleError::InvalidArguments("missing contract id".to_string()))?;

        ctx.log(&format!("{} calling {}", LOG_PREFIX, operation.entry_point));
        forward(ctx, &contract_id, &operation)?;
        Ok(())
    }

    fn on_install(&self, ctx: &mut dyn ExecutionContext, _args: OnInstallArgs) -> Result<(), ModuleError> {
        ctx.log(&format!("{} called on_install", LOG_PREFIX));

        if OWNER.get(&*ctx)?.is_some() {
            return Err(ModuleError::AlreadyInstalled);
        }

        // installs always arrive through a host account, which is the caller
        let owner = ctx.caller_of_caller().ok_or(ModuleError::NotAuthorized)?;
        OWNER.put(ctx, &AccountId { value: owner.to_vec() })?;

        if CONFIG.get(&*ctx)?.is_none() {
            CONFIG.put(ctx, &ConfigStorage::default())?;
        }

        debug!("Module {} installed for {}", ctx.current_contract_id(), owner);
        Ok(())
    }
}

impl Contract for ExecutionAny {
    fn invoke(
        &self,
        ctx: &mut dyn ExecutionContext,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, ModuleError> {
        if let Some(result) = dispatch_module(self, ctx, entry_point, args) {
            return result;
        }

        match EntryPoint::from_id(entry_point) {
            Some(EntryPoint::AddSkipEntryPoint) => {
                self.add_skip_entry_point(ctx, AddSkipEntryPointArgs::decode(args)?)?;
                Ok(EmptyResult {}.encode_to_vec())
            }
            Some(EntryPoint::RemoveSkipEntryPoint) => {
                self.remove_skip_entry_point(ctx, RemoveSkipEntryPointArgs::decode(args)?)?;
                Ok(EmptyResult {}.encode_to_vec())
            }
            Some(EntryPoint::GetSkipEntryPoints) => {
                Ok(self.get_skip_entry_points(&*ctx)?.encode_to_vec())
            }
            Some(EntryPoint::GetAccountId) => Ok(self.get_account_id(&*ctx)?.encode_to_vec()),
            _ => Err(ModuleError::UnknownEntryPoint(entry_point)),
        }
    }

    fn read_only(&self, entry_point: u32) -> bool {
        EntryPoint::from_id(entry_point).map_or(false, |ep| ep.read_only())
    }
}
