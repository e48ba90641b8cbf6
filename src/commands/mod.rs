pub mod encoder;
pub mod parser;
pub mod types;

pub use encoder::CommandEncoder;
pub use parser::ResponseParser;
pub use types::{
    BaseParameters, BaudRate, Command, Connectability, ConnectionStatus, Field, LedState,
    ModuleParameters, Parity, ProtocolToken, RfPower, Role, WorkingMode,
};
