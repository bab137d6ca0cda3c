//! Fixed-capacity interface table and size-validated dispatch.

use alp_codec::InterfaceConfig;
use tracing::{debug, warn};

use crate::error::{InterfaceError, Result};
use crate::traits::{AlpInterface, TransactionId};

/// Registry capacity: at most this many interfaces per node.
pub const MAX_INTERFACES: usize = 10;

/// Table of registered transport interfaces.
///
/// Registration happens during a bounded startup phase; steady-state dispatch
/// only reads the table. Callers that register concurrently with dispatch
/// must guard the registry with their own lock.
#[derive(Default)]
pub struct InterfaceRegistry {
    entries: Vec<Box<dyn AlpInterface>>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_INTERFACES),
        }
    }

    /// Register an interface endpoint, bringing it up via its `init` routine.
    ///
    /// Fails with `RegistryFull` when all slots are taken,
    /// `DuplicateInterface` when the endpoint is `unique` and its id is
    /// already present, or `Init` when the endpoint fails to come up; a
    /// failed registration leaves the table unchanged.
    pub fn register(&mut self, mut interface: Box<dyn AlpInterface>) -> Result<()> {
        if self.entries.len() >= MAX_INTERFACES {
            warn!(
                itf_id = interface.itf_id(),
                "interface registry full, rejecting registration"
            );
            return Err(InterfaceError::RegistryFull {
                max: MAX_INTERFACES,
            });
        }
        let itf_id = interface.itf_id();
        if interface.unique() && self.entries.iter().any(|entry| entry.itf_id() == itf_id) {
            return Err(InterfaceError::DuplicateInterface { itf_id });
        }
        interface
            .init(None)
            .map_err(|source| InterfaceError::Init { itf_id, source })?;
        debug!(itf_id, "registered ALP interface");
        self.entries.push(interface);
        Ok(())
    }

    /// Number of registered interfaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the interface registered under `itf_id`.
    pub fn lookup(&self, itf_id: u8) -> Option<&dyn AlpInterface> {
        self.entries
            .iter()
            .find(|entry| entry.itf_id() == itf_id)
            .map(Box::as_ref)
    }

    fn lookup_mut(&mut self, itf_id: u8) -> Option<&mut Box<dyn AlpInterface>> {
        self.entries.iter_mut().find(|entry| entry.itf_id() == itf_id)
    }

    /// Send a composed command through the interface registered under
    /// `itf_id`, returning the transaction id its send routine produces.
    ///
    /// Validates the encoded config size against the interface's declared
    /// slot before invoking the send routine; send failures are passed
    /// through, not reinterpreted.
    pub fn dispatch(
        &mut self,
        itf_id: u8,
        payload: &[u8],
        expected_response_length: u32,
        config: Option<&InterfaceConfig>,
    ) -> Result<TransactionId> {
        let interface = self
            .lookup_mut(itf_id)
            .ok_or(InterfaceError::NotFound { itf_id })?;
        if let Some(config) = config {
            let size = config.body.encoded_len();
            let max = interface.config_size();
            if size > max {
                return Err(InterfaceError::ConfigTooLarge { itf_id, size, max });
            }
        }
        debug!(
            itf_id,
            payload_len = payload.len(),
            expected_response_length,
            "dispatching command"
        );
        interface
            .send_command(payload, expected_response_length, config)
            .map_err(|source| InterfaceError::Send { itf_id, source })
    }

    /// Tear down every registered interface. Driven by process shutdown.
    pub fn deinit_all(&mut self) {
        for entry in &mut self.entries {
            entry.deinit();
        }
        self.entries.clear();
    }
}
