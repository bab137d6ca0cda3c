use alp_codec::{InterfaceConfig, ITF_CONFIG_SIZE, ITF_STATUS_SIZE};

/// Identifier correlating a dispatched command with its later completion.
///
/// Correlation itself is the session layer's concern; the registry only hands
/// the id back to the caller.
pub type TransactionId = u16;

/// Failure reported by an interface's own send routine.
pub type SendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A transport or session endpoint a composed command can be sent through.
///
/// `send_command` must return promptly with a transaction id or a failure;
/// the actual transmission completes asynchronously behind the interface's
/// own session mechanism.
pub trait AlpInterface: Send {
    /// Wire-visible interface id this endpoint answers to.
    fn itf_id(&self) -> u8;

    /// Declared config slot width for dispatch validation.
    fn config_size(&self) -> usize {
        ITF_CONFIG_SIZE
    }

    /// Declared status slot width.
    fn status_size(&self) -> usize {
        ITF_STATUS_SIZE
    }

    /// Whether at most one endpoint may be registered under this id.
    fn unique(&self) -> bool {
        true
    }

    /// Bring the interface up. Called once at registration time.
    fn init(&mut self, _config: Option<&InterfaceConfig>) -> std::result::Result<(), SendError> {
        Ok(())
    }

    /// Tear the interface down. Driven by whole-table shutdown.
    fn deinit(&mut self) {}

    /// Queue `payload` for transmission and return a transaction id.
    fn send_command(
        &mut self,
        payload: &[u8],
        expected_response_length: u32,
        config: Option<&InterfaceConfig>,
    ) -> std::result::Result<TransactionId, SendError>;
}
