//! Core types shared by the host runtime and the modules

pub mod address;
pub mod operation;

pub use address::{Address, AddressParseError, ADDRESS_SIZE};
pub use operation::Operation;
