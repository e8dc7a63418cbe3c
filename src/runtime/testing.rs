//! Scripted execution context for module unit tests

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::{Address, ADDRESS_SIZE};

use super::context::{AuthorityKind, ExecutionContext};
use super::error::{CallError, ModuleError};

/// A downstream call observed by [`MockContext`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub contract_id: Address,
    pub entry_point: u32,
    pub args: Vec<u8>,
}

/// In-memory context with a fixed caller chain
pub struct MockContext {
    pub contract_id: Address,
    pub caller: Option<Address>,
    pub caller_of_caller: Option<Address>,
    pub authorized: HashSet<Address>,
    pub objects: HashMap<(u32, Vec<u8>), Vec<u8>>,
    pub calls: Vec<RecordedCall>,
    pub call_results: VecDeque<Result<Vec<u8>, CallError>>,
    pub logs: Vec<String>,
    pub read_only: bool,
}

pub fn addr(n: u8) -> Address {
    Address::new([n; ADDRESS_SIZE])
}

impl MockContext {
    pub fn new(contract_id: Address) -> Self {
        Self {
            contract_id,
            caller: None,
            caller_of_caller: None,
            authorized: HashSet::new(),
            objects: HashMap::new(),
            calls: Vec::new(),
            call_results: VecDeque::new(),
            logs: Vec::new(),
            read_only: false,
        }
    }

    pub fn with_callers(mut self, caller: Address, caller_of_caller: Address) -> Self {
        self.caller = Some(caller);
        self.caller_of_caller = Some(caller_of_caller);
        self
    }

    /// Make `account` pass authority checks
    pub fn authorize(&mut self, account: Address) {
        self.authorized.insert(account);
    }

    pub fn revoke_all(&mut self) {
        self.authorized.clear();
    }

    /// Result returned by the next downstream call
    pub fn push_call_result(&mut self, result: Result<Vec<u8>, CallError>) {
        self.call_results.push_back(result);
    }

    pub fn raw_object(&self, space: u32) -> Option<&Vec<u8>> {
        self.objects.get(&(space, self.contract_id.to_vec()))
    }

    pub fn has_log(&self, line: &str) -> bool {
        self.logs.iter().any(|l| l == line)
    }
}

impl ExecutionContext for MockContext {
    fn current_contract_id(&self) -> Address {
        self.contract_id
    }

    fn caller(&self) -> Option<Address> {
        self.caller
    }

    fn caller_of_caller(&self) -> Option<Address> {
        self.caller_of_caller
    }

    fn check_authority(&self, _kind: AuthorityKind, account: &Address) -> bool {
        self.authorized.contains(account)
    }

    fn call(
        &mut self,
        contract_id: &Address,
        entry_point: u32,
        args: &[u8],
    ) -> Result<Vec<u8>, CallError> {
        self.calls.push(RecordedCall {
            contract_id: *contract_id,
            entry_point,
            args: args.to_vec(),
        });
        self.call_results.pop_front().unwrap_or(Ok(Vec::new()))
    }

    fn get_object(&self, space: u32, key: &[u8]) -> Option<Vec<u8>> {
        self.objects.get(&(space, key.to_vec())).cloned()
    }

    fn put_object(&mut self, space: u32, key: &[u8], value: Vec<u8>) -> Result<(), ModuleError> {
        if self.read_only {
            return Err(ModuleError::ReadOnlyViolation);
        }
        self.objects.insert((space, key.to_vec()), value);
        Ok(())
    }

    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }
}
