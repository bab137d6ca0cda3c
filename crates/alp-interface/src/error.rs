/// Errors that can occur in interface registration and dispatch.
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// All registry slots are occupied.
    #[error("interface registry full ({max} slots)")]
    RegistryFull { max: usize },

    /// A unique interface id was registered twice.
    #[error("interface {itf_id:#04x} already registered")]
    DuplicateInterface { itf_id: u8 },

    /// No interface is registered under the requested id.
    #[error("no interface registered for id {itf_id:#04x}")]
    NotFound { itf_id: u8 },

    /// The encoded config exceeds the interface's declared config slot.
    #[error("config ({size} bytes) exceeds interface {itf_id:#04x} slot ({max} bytes)")]
    ConfigTooLarge {
        itf_id: u8,
        size: usize,
        max: usize,
    },

    /// The interface's init routine failed during registration.
    #[error("interface {itf_id:#04x} failed to initialise: {source}")]
    Init {
        itf_id: u8,
        #[source]
        source: crate::traits::SendError,
    },

    /// The interface's send routine failed; passed through untouched.
    #[error("send failed on interface {itf_id:#04x}: {source}")]
    Send {
        itf_id: u8,
        #[source]
        source: crate::traits::SendError,
    },
}

pub type Result<T> = std::result::Result<T, InterfaceError>;
