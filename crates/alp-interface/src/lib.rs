//! Transport interface registry for composed ALP commands.
//!
//! A composed command (a byte buffer of encoded actions) is transmitted
//! through one of several physical or session interfaces. Each interface is a
//! capability implementing [`AlpInterface`]; the [`InterfaceRegistry`] holds a
//! fixed number of them and dispatches payloads by interface id, returning a
//! transaction id the session layer uses to correlate the asynchronous
//! completion.

pub mod error;
pub mod host;
pub mod registry;
pub mod traits;

pub use error::{InterfaceError, Result};
pub use host::HostInterface;
pub use registry::{InterfaceRegistry, MAX_INTERFACES};
pub use traits::{AlpInterface, SendError, TransactionId};
