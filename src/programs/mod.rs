//! Execution modules
//!
//! Interchangeable implementations of [`ExecutionModule`](crate::runtime::ExecutionModule)
//! a host account can install.

pub mod execution_any;
pub mod forward;

pub use execution_any::ExecutionAny;
pub use forward::ForwardExecution;
