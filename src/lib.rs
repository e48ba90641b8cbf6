#![cfg_attr(not(test), no_std)]

pub mod commands;
pub mod config;
pub mod driver;
pub mod error;
pub mod transport;

pub use commands::types::{Command, ConnectionStatus, Field, ModuleParameters};
pub use driver::Hc08;
pub use error::Error;
pub use transport::{Transport, TransportError};
