//! Entry point table exposed to the host

use sha2::{Digest, Sha256};

/// Derive the numeric id of an entry point from its name
///
/// The id is the first four bytes of SHA-256(name), big-endian.
pub fn entry_point_id(name: &str) -> u32 {
    let digest = Sha256::digest(name.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// External entry points of an execution module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    Manifest,
    Execute,
    OnInstall,
    AddSkipEntryPoint,
    RemoveSkipEntryPoint,
    GetSkipEntryPoints,
    GetAccountId,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 7] = [
        EntryPoint::Manifest,
        EntryPoint::Execute,
        EntryPoint::OnInstall,
        EntryPoint::AddSkipEntryPoint,
        EntryPoint::RemoveSkipEntryPoint,
        EntryPoint::GetSkipEntryPoints,
        EntryPoint::GetAccountId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::Execute => "execute",
            Self::OnInstall => "on_install",
            Self::AddSkipEntryPoint => "add_skip_entry_point",
            Self::RemoveSkipEntryPoint => "remove_skip_entry_point",
            Self::GetSkipEntryPoints => "get_skip_entry_points",
            Self::GetAccountId => "get_account_id",
        }
    }

    pub fn id(&self) -> u32 {
        entry_point_id(self.name())
    }

    /// Read-only entry points never write state
    pub fn read_only(&self) -> bool {
        matches!(
            self,
            Self::Manifest | Self::GetSkipEntryPoints | Self::GetAccountId
        )
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|ep| ep.id() == id)
    }
}
