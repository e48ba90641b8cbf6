#[cfg(feature = "embedded-io")]
pub mod io;
pub mod traits;

#[cfg(feature = "embedded-io")]
pub use io::IoTransport;
pub use traits::{Transport, TransportError};
