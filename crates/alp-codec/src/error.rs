/// Errors that can occur during ALP encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlpError {
    /// The cursor ran out of bytes before the current field was fully read.
    ///
    /// Recoverable in streaming contexts: re-invoke once more bytes arrive.
    #[error("input truncated before the current field could be read")]
    TruncatedInput,

    /// The low 6 bits of a control byte do not name a defined operation.
    #[error("control byte carries undefined opcode {0:#04x}")]
    InvalidOpcode(u8),

    /// An action's opcode is not one this decoder understands.
    ///
    /// Mirrors the `UnknownOperation` wire status reported back to a peer.
    #[error("unknown ALP operation {0:#04x}")]
    UnknownOperation(u8),

    /// A wire status byte does not map to a defined status code.
    #[error("undefined wire status code {0:#04x}")]
    InvalidStatusCode(u8),

    /// A permission operand names an unsupported permission scheme.
    #[error("unsupported permission id {0:#04x}")]
    UnsupportedPermission(u8),

    /// The value cannot be represented by a length operand.
    #[error("value {value} too large for a length operand (max {max})")]
    ValueTooLarge { value: u32, max: u32 },

    /// A payload or operand body exceeds its wire bound.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A query mask does not cover its compare value byte for byte.
    #[error("query mask length {mask} does not match value length {value}")]
    MaskLengthMismatch { mask: usize, value: usize },

    /// The accumulated expected response length exceeds the receive buffer
    /// bound.
    #[error("expected response length {0} overflows the receive buffer bound")]
    ResponseLengthOverflow(u64),
}

pub type Result<T> = std::result::Result<T, AlpError>;
