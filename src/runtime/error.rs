//! Module and call errors

use crate::core::Address;

/// Exit code reported for every module failure other than a forwarded one
pub const FAILURE_CODE: i32 = 1;

/// Exit code reported by the host for failures it raises itself
pub const HOST_FAILURE_CODE: i32 = -1;

/// Fallback text when a downstream contract fails without a message
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Errors raised by execution modules
///
/// Every variant aborts the enclosing transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("not authorized")]
    NotAuthorized,

    #[error("config not found")]
    ConfigNotFound,

    #[error("failed to call {contract}: {message}")]
    DownstreamCallFailed {
        code: i32,
        contract: Address,
        message: String,
    },

    #[error("module not installed")]
    NotInstalled,

    #[error("module already installed")]
    AlreadyInstalled,

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown entry point: 0x{0:08x}")]
    UnknownEntryPoint(u32),

    #[error("write attempted in read-only context")]
    ReadOnlyViolation,

    #[error("corrupt record in space {space}: {reason}")]
    CorruptRecord { space: u32, reason: String },
}

impl ModuleError {
    /// Exit code surfaced in the transaction receipt
    pub fn code(&self) -> i32 {
        match self {
            ModuleError::DownstreamCallFailed { code, .. } => *code,
            _ => FAILURE_CODE,
        }
    }

    pub(crate) fn invalid_args(err: impl std::fmt::Display) -> Self {
        ModuleError::InvalidArguments(err.to_string())
    }
}

impl From<prost::DecodeError> for ModuleError {
    fn from(e: prost::DecodeError) -> Self {
        ModuleError::invalid_args(e)
    }
}

/// Nonzero status returned by the call-dispatch primitive
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("call failed with code {code}: {}", .message.as_deref().unwrap_or(UNKNOWN_ERROR))]
pub struct CallError {
    pub code: i32,
    pub message: Option<String>,
}

impl CallError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    /// Failure without a downstream message
    pub fn code_only(code: i32) -> Self {
        Self { code, message: None }
    }

    /// Message to report upstream, falling back to "unknown error"
    pub fn message_or_unknown(&self) -> &str {
        match self.message.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => UNKNOWN_ERROR,
        }
    }
}

impl From<&ModuleError> for CallError {
    fn from(err: &ModuleError) -> Self {
        CallError::new(err.code(), err.to_string())
    }
}
