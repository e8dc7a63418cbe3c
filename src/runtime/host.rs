//! Local host - runs transactions against deployed contracts
//!
//! The host owns committed state and the contract registry. Each transaction
//! runs in its own [`HostContext`]: writes go to a [`WriteSet`], every nested
//! call gets a savepoint, and the whole set is committed only when every
//! operation succeeded.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::HostConfig;
use crate::core::{Address, Operation};
use crate::storage::{ObjectKey, StateStore, StorageError, WriteSet};

use super::context::{AuthorityKind, ExecutionContext};
use super::error::{CallError, ModuleError, HOST_FAILURE_CODE};
use super::module::Contract;

/// Host errors
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// A transaction submitted to the host
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Account paying for and originating the transaction
    pub payer: Address,
    /// Accounts whose signatures the transaction carries
    pub signers: Vec<Address>,
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// New transaction signed by its payer
    pub fn new(payer: Address) -> Self {
        Self {
            payer,
            signers: vec![payer],
            operations: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }
}

/// Outcome of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Success or failure
    pub success: bool,
    /// Exit code, 0 on success
    pub code: i32,
    /// Error message if failed
    pub error: Option<String>,
    /// Return value of each operation (empty on failure)
    pub results: Vec<Vec<u8>>,
    /// Log lines, including those emitted before a failure
    pub logs: Vec<String>,
}

impl Receipt {
    pub fn success(results: Vec<Vec<u8>>, logs: Vec<String>) -> Self {
        Self {
            success: true,
            code: 0,
            error: None,
            results,
            logs,
        }
    }

    pub fn failure(code: i32, error: String, logs: Vec<String>) -> Self {
        Self {
            success: false,
            code,
            error: Some(error),
            results: Vec::new(),
            logs,
        }
    }

    pub fn has_log(&self, line: &str) -> bool {
        self.logs.iter().any(|l| l == line)
    }
}

/// Local execution host
pub struct Host {
    /// Deployed contracts
    contracts: RwLock<HashMap<Address, Arc<dyn Contract>>>,
    /// Committed state
    state: StateStore,
    config: HostConfig,
}

impl Host {
    /// Create a host with in-memory state
    pub fn new_memory() -> Self {
        Self::with_store(StateStore::new_memory(), HostConfig::default())
    }

    /// Create a host from configuration (sled-backed when `data_dir` is set)
    pub fn new(config: HostConfig) -> Result<Self, HostError> {
        config.validate()?;

        let state = match config.data_dir {
            Some(ref dir) => {
                let db = sled::open(dir)?;
                info!("State database opened at {}", dir.display());
                StateStore::new_persistent(db.open_tree("state")?)?
            }
            None => StateStore::new_memory(),
        };

        Ok(Self::with_store(state, config))
    }

    fn with_store(state: StateStore, config: HostConfig) -> Self {
        Self {
            contracts: RwLock::new(HashMap::new()),
            state,
            config,
        }
    }

    /// Deploy (or replace) a contract at `address`
    pub fn deploy(&self, address: Address, contract: Arc<dyn Contract>) {
        debug!("Deploying contract at {}", address);
        self.contracts.write().insert(address, contract);
    }

    pub fn contract(&self, address: &Address) -> Option<Arc<dyn Contract>> {
        self.contracts.read().get(address).cloned()
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Run a transaction; its writes commit only if every operation succeeds
    pub fn apply(&self, tx: &Transaction) -> Receipt {
        let mut ctx = HostContext::new(self, &tx.signers, Some(tx.payer), false);
        let mut results = Vec::with_capacity(tx.operations.len());

        for op in &tx.operations {
            let Some(contract_id) = op.contract_id else {
                let (_, logs) = ctx.finish();
                return Receipt::failure(
                    HOST_FAILURE_CODE,
                    "operation has no contract id".to_string(),
                    logs,
                );
            };

            match ctx.call(&contract_id, op.entry_point, &op.args) {
                Ok(output) => results.push(output),
                Err(err) => {
                    let (_, logs) = ctx.finish();
                    warn!("Transaction from {} reverted: {}", tx.payer, err);
                    return Receipt::failure(err.code, err.message_or_unknown().to_string(), logs);
                }
            }
        }

        let (writes, logs) = ctx.finish();
        if let Err(e) = self.state.commit(writes.into_changes()) {
            return Receipt::failure(HOST_FAILURE_CODE, e.to_string(), logs);
        }

        Receipt::success(results, logs)
    }

    /// Read-only call outside of any transaction
    pub fn read(
        &self,
        contract_id: &Address,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, CallError> {
        let mut ctx = HostContext::new(self, &[], None, true);
        ctx.call(contract_id, entry_point, args)
    }
}

/// One entry of the call stack
#[derive(Debug, Clone, Copy)]
struct Frame {
    contract: Address,
    read_only: bool,
}

/// Execution context of one running transaction
struct HostContext<'a> {
    host: &'a Host,
    signers: &'a [Address],
    writes: WriteSet,
    frames: Vec<Frame>,
    logs: Vec<String>,
    /// Whole context is read-only (queries outside a transaction)
    read_only: bool,
}

impl<'a> HostContext<'a> {
    fn new(host: &'a Host, signers: &'a [Address], origin: Option<Address>, read_only: bool) -> Self {
        let frames = origin
            .map(|contract| vec![Frame { contract, read_only }])
            .unwrap_or_default();

        Self {
            host,
            signers,
            writes: WriteSet::new(),
            frames,
            logs: Vec::new(),
            read_only,
        }
    }

    /// Frame of the contract `depth` levels above the current one
    fn frame_above(&self, depth: usize) -> Option<&Frame> {
        self.frames.len().checked_sub(depth + 1).and_then(|i| self.frames.get(i))
    }

    fn in_read_only(&self) -> bool {
        self.frames.last().map_or(self.read_only, |f| f.read_only)
    }

    fn finish(self) -> (WriteSet, Vec<String>) {
        (self.writes, self.logs)
    }
}

impl ExecutionContext for HostContext<'_> {
    fn current_contract_id(&self) -> Address {
        self.frames.last().map(|f| f.contract).unwrap_or_default()
    }

    fn caller(&self) -> Option<Address> {
        self.frame_above(1).map(|f| f.contract)
    }

    fn caller_of_caller(&self) -> Option<Address> {
        self.frame_above(2).map(|f| f.contract)
    }

    fn check_authority(&self, kind: AuthorityKind, account: &Address) -> bool {
        if self.signers.contains(account) {
            return true;
        }
        // a contract further up the stack acts on its own behalf
        let upstream = &self.frames[..self.frames.len().saturating_sub(1)];
        let authorized = upstream.iter().any(|f| &f.contract == account);
        debug!("Authority {:?} for {}: {}", kind, account, authorized);
        authorized
    }

    fn call(
        &mut self,
        contract_id: &Address,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, CallError> {
        if self.frames.len() > self.host.config.max_call_depth {
            return Err(CallError::new(
                HOST_FAILURE_CODE,
                format!("call depth limit {} exceeded", self.host.config.max_call_depth),
            ));
        }

        let contract = self.host.contract(contract_id).ok_or_else(|| {
            CallError::new(HOST_FAILURE_CODE, format!("contract {} does not exist", contract_id))
        })?;

        let read_only = contract.read_only(entry_point) || self.in_read_only();
        self.frames.push(Frame {
            contract: *contract_id,
            read_only,
        });
        self.writes.begin();

        let result = contract.invoke(self, entry_point, args);
        self.frames.pop();

        match result {
            Ok(output) => {
                self.writes.release();
                Ok(output)
            }
            Err(err) => {
                self.writes.rollback();
                debug!("Call to {} entry 0x{:08x} failed: {}", contract_id, entry_point, err);
                Err(CallError::from(&err))
            }
        }
    }

    fn get_object(&self, space: u32, key: &[u8]) -> Option<Vec<u8>> {
        let key = ObjectKey::new(self.current_contract_id(), space, key);
        self.writes.get(&key, &self.host.state)
    }

    fn put_object(&mut self, space: u32, key: &[u8], value: Vec<u8>) -> Result<(), ModuleError> {
        if self.in_read_only() {
            return Err(ModuleError::ReadOnlyViolation);
        }
        let key = ObjectKey::new(self.current_contract_id(), space, key);
        self.writes.put(key, value);
        Ok(())
    }

    fn log(&mut self, message: &str) {
        debug!(contract = %self.current_contract_id(), "{}", message);
        self.logs.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::addr;

    const SET: u32 = 1;
    const GET: u32 = 2;
    const FAIL: u32 = 3;
    const WHO: u32 = 4;
    const RELAY: u32 = 5;

    /// Stores a byte, reads it back, fails on demand, or relays a call
    struct Scratch;

    impl Contract for Scratch {
        fn invoke(
            &self,
            ctx: &mut dyn ExecutionContext,
            entry_point: u32,
            args: &[u8],
        ) -> Result<Vec<u8>, ModuleError> {
            match entry_point {
                SET => {
                    ctx.log("set");
                    ctx.put_object(0, b"v", args.to_vec())?;
                    Ok(Vec::new())
                }
                GET => Ok(ctx.get_object(0, b"v").unwrap_or_default()),
                FAIL => {
                    ctx.put_object(0, b"v", vec![0xff])?;
                    ctx.log("about to fail");
                    Err(ModuleError::InvalidArguments("requested".to_string()))
                }
                WHO => {
                    let mut out = ctx.caller().map(|a| a.to_vec()).unwrap_or_default();
                    out.extend(ctx.caller_of_caller().map(|a| a.to_vec()).unwrap_or_default());
                    Ok(out)
                }
                RELAY => {
                    let target = Address::from_slice(&args[..25]).map_err(ModuleError::invalid_args)?;
                    let ep = args[25] as u32;
                    ctx.call(&target, ep, &args[26..]).map_err(|e| ModuleError::DownstreamCallFailed {
                        code: e.code,
                        contract: target,
                        message: e.message_or_unknown().to_string(),
                    })
                }
                other => Err(ModuleError::UnknownEntryPoint(other)),
            }
        }

        fn read_only(&self, entry_point: u32) -> bool {
            entry_point == GET || entry_point == WHO
        }
    }

    fn host_with_scratch() -> Host {
        let host = Host::new_memory();
        host.deploy(addr(10), Arc::new(Scratch));
        host.deploy(addr(11), Arc::new(Scratch));
        host
    }

    #[test]
    fn test_commit_on_success() {
        let host = host_with_scratch();
        let tx = Transaction::new(addr(1)).with_operation(Operation::new(addr(10), SET, vec![7]));

        let receipt = host.apply(&tx);
        assert!(receipt.success);
        assert!(receipt.has_log("set"));
        assert_eq!(host.read(&addr(10), GET, &[]).unwrap(), vec![7]);
    }

    #[test]
    fn test_failed_operation_discards_all_writes() {
        let host = host_with_scratch();
        let tx = Transaction::new(addr(1))
            .with_operation(Operation::new(addr(10), SET, vec![7]))
            .with_operation(Operation::new(addr(11), FAIL, vec![]));

        let receipt = host.apply(&tx);
        assert!(!receipt.success);
        assert_eq!(receipt.code, 1);
        assert!(receipt.has_log("about to fail"));
        assert!(host.state().is_empty());
        assert_eq!(host.read(&addr(10), GET, &[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_unknown_contract() {
        let host = host_with_scratch();
        let err = host.read(&addr(99), GET, &[]).unwrap_err();
        assert_eq!(err.code, HOST_FAILURE_CODE);
        assert!(err.message_or_unknown().contains("does not exist"));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let host = host_with_scratch();
        let err = host.read(&addr(10), SET, &[1]).unwrap_err();
        assert!(err.message_or_unknown().contains("read-only"));
    }

    #[test]
    fn test_caller_chain() {
        let host = host_with_scratch();
        let mut args = addr(11).to_vec();
        args.push(WHO as u8);
        let tx = Transaction::new(addr(1)).with_operation(Operation::new(addr(10), RELAY, args));

        let receipt = host.apply(&tx);
        assert!(receipt.success);
        let mut expected = addr(10).to_vec();
        expected.extend(addr(1).to_vec());
        assert_eq!(receipt.results[0], expected);
    }

    #[test]
    fn test_depth_limit() {
        let host = Host::new(HostConfig {
            max_call_depth: 1,
            ..Default::default()
        })
        .unwrap();
        host.deploy(addr(10), Arc::new(Scratch));
        host.deploy(addr(11), Arc::new(Scratch));

        let mut args = addr(11).to_vec();
        args.push(SET as u8);
        let tx = Transaction::new(addr(1)).with_operation(Operation::new(addr(10), RELAY, args));

        let receipt = host.apply(&tx);
        assert!(!receipt.success);
        assert_eq!(receipt.code, HOST_FAILURE_CODE);
        assert!(receipt.error.unwrap().contains("call depth limit"));
    }

    #[test]
    fn test_sled_backed_host_commits() {
        let dir = tempfile::tempdir().unwrap();
        let host = Host::new(HostConfig {
            data_dir: Some(dir.path().join("state")),
            ..Default::default()
        })
        .unwrap();
        host.deploy(addr(10), Arc::new(Scratch));

        let tx = Transaction::new(addr(1)).with_operation(Operation::new(addr(10), SET, vec![4]));
        assert!(host.apply(&tx).success);
        assert_eq!(host.read(&addr(10), GET, &[]).unwrap(), vec![4]);
        assert_eq!(host.state().len(), 1);

        assert!(dir.path().join("state").exists());
    }
}
