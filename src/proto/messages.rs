//! Wire messages exchanged with the host and persisted in module storage
//!
//! Field tags follow the published module ABI, so records written by other
//! implementations of the module decode unchanged.

/// Persisted skip-list configuration
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConfigStorage {
    /// Entry points that must not be forwarded, in insertion order
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub skip_entry_points: Vec<u32>,
}

/// Persisted owner identity, also the result of `get_account_id`
#[derive(Clone, PartialEq, prost::Message)]
pub struct AccountId {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

/// Operation as it travels over the call boundary
#[derive(Clone, PartialEq, prost::Message)]
pub struct CallOperation {
    #[prost(bytes = "vec", tag = "1")]
    pub contract_id: Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub entry_point: u32,
    #[prost(bytes = "vec", tag = "3")]
    pub args: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteArgs {
    #[prost(message, optional, tag = "1")]
    pub operation: Option<CallOperation>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AddSkipEntryPointArgs {
    #[prost(uint32, tag = "1")]
    pub entry_point: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RemoveSkipEntryPointArgs {
    #[prost(uint32, tag = "1")]
    pub entry_point: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetSkipEntryPointsResult {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub value: Vec<u32>,
}

/// Install arguments are opaque to this module
#[derive(Clone, PartialEq, prost::Message)]
pub struct OnInstallArgs {}

/// Result of entry points that return nothing
#[derive(Clone, PartialEq, prost::Message)]
pub struct EmptyResult {}

/// Entry point (optionally bound to a contract) a module may act upon
#[derive(Clone, PartialEq, prost::Message)]
pub struct Scope {
    #[prost(uint32, tag = "1")]
    pub entry_point: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub contract_id: Vec<u8>,
}

impl Scope {
    pub fn new(entry_point: u32) -> Self {
        Self {
            entry_point,
            contract_id: Vec::new(),
        }
    }
}

/// Module discovery metadata
#[derive(Clone, PartialEq, prost::Message)]
pub struct Manifest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(uint32, tag = "3")]
    pub type_id: u32,
    #[prost(string, tag = "4")]
    pub version: String,
    #[prost(message, repeated, tag = "5")]
    pub scopes: Vec<Scope>,
}
