//! Host (loopback) interface.
//!
//! Delivers composed commands to an in-process handler instead of a radio,
//! which is enough for local command execution, tests, and the CLI.

use alp_codec::{InterfaceConfig, ITF_ID_HOST};
use tracing::trace;

use crate::traits::{AlpInterface, SendError, TransactionId};

/// In-process delivery of composed commands.
pub struct HostInterface {
    handler: Box<dyn FnMut(&[u8], u32) + Send>,
    next_transaction: TransactionId,
}

impl HostInterface {
    /// Create a host interface delivering payloads to `handler`.
    ///
    /// The handler receives the raw payload and the expected response length
    /// the dispatching layer computed for it.
    pub fn new(handler: impl FnMut(&[u8], u32) + Send + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            next_transaction: 0,
        }
    }
}

impl AlpInterface for HostInterface {
    fn itf_id(&self) -> u8 {
        ITF_ID_HOST
    }

    fn send_command(
        &mut self,
        payload: &[u8],
        expected_response_length: u32,
        _config: Option<&InterfaceConfig>,
    ) -> std::result::Result<TransactionId, SendError> {
        let transaction_id = self.next_transaction;
        self.next_transaction = self.next_transaction.wrapping_add(1);
        trace!(
            transaction_id,
            payload_len = payload.len(),
            "delivering command to host handler"
        );
        (self.handler)(payload, expected_response_length);
        Ok(transaction_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn host_delivers_payload_and_increments_transaction_ids() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&delivered);
        let mut host = HostInterface::new(move |payload, expected| {
            assert_eq!(payload, &[0x01, 0x05, 0x00, 0x00, 0x00, 0x00, 0x0A]);
            assert_eq!(expected, 17);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let payload = [0x01, 0x05, 0x00, 0x00, 0x00, 0x00, 0x0A];
        let first = host.send_command(&payload, 17, None).unwrap();
        let second = host.send_command(&payload, 17, None).unwrap();
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(delivered.load(Ordering::SeqCst), 2);
    }
}
