//! Operation requested by the host account

use serde::{Deserialize, Serialize};

use super::address::{Address, AddressParseError};
use crate::proto::CallOperation;

/// A single contract call the host asks the module to execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Target contract, required only when the call is forwarded
    pub contract_id: Option<Address>,
    /// Entry point on the target contract
    pub entry_point: u32,
    /// Call arguments (empty when not supplied)
    pub args: Vec<u8>,
}

impl Operation {
    pub fn new(contract_id: Address, entry_point: u32, args: Vec<u8>) -> Self {
        Self {
            contract_id: Some(contract_id),
            entry_point,
            args,
        }
    }

    /// Wire form of the operation
    pub fn to_call(&self) -> CallOperation {
        CallOperation {
            contract_id: self.contract_id.map(|id| id.to_vec()).unwrap_or_default(),
            entry_point: self.entry_point,
            args: self.args.clone(),
        }
    }
}

impl TryFrom<CallOperation> for Operation {
    type Error = AddressParseError;

    fn try_from(call: CallOperation) -> Result<Self, Self::Error> {
        let contract_id = if call.contract_id.is_empty() {
            None
        } else {
            Some(Address::from_slice(&call.contract_id)?)
        };

        Ok(Self {
            contract_id,
            entry_point: call.entry_point,
            args: call.args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ADDRESS_SIZE;

    #[test]
    fn test_missing_contract_id_is_none() {
        let op = Operation::try_from(CallOperation {
            contract_id: Vec::new(),
            entry_point: 42,
            args: Vec::new(),
        })
        .unwrap();
        assert_eq!(op.contract_id, None);
        assert_eq!(op.entry_point, 42);
    }

    #[test]
    fn test_malformed_contract_id() {
        let result = Operation::try_from(CallOperation {
            contract_id: vec![1, 2, 3],
            entry_point: 1,
            args: Vec::new(),
        });
        assert_eq!(result, Err(AddressParseError::InvalidLength(3)));
    }

    #[test]
    fn test_to_call_keeps_fields() {
        let target = Address::new([3u8; ADDRESS_SIZE]);
        let op = Operation::new(target, 9, vec![0xde, 0xad]);
        let call = op.to_call();
        assert_eq!(call.contract_id, target.to_vec());
        assert_eq!(call.entry_point, 9);
        assert_eq!(call.args, vec![0xde, 0xad]);
        assert_eq!(Operation::try_from(call).unwrap(), op);
    }
}
