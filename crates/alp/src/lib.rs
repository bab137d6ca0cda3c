//! Application Layer Protocol codec and interface dispatch.
//!
//! alp implements the compact action language used by small wireless sensor
//! nodes to describe remote file operations, control flow, and session
//! bookkeeping, plus the transport-interface registry that dispatches
//! composed commands.
//!
//! # Crate Structure
//!
//! - [`codec`] — wire codec: control byte, operands, action encoder/decoder
//! - [`interface`] — transport interface capability trait and registry

/// Re-export codec types.
pub mod codec {
    pub use alp_codec::*;
}

/// Re-export interface types.
pub mod interface {
    pub use alp_interface::*;
}
