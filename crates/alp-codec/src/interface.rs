//! Interface configuration and status value objects.
//!
//! A composed command can be forwarded over one of several transport
//! interfaces. Known interface families carry typed session records on the
//! wire; anything else is an opaque byte block. Both must fit the fixed
//! config/status slot widths.

/// Host (loopback) interface.
pub const ITF_ID_HOST: u8 = 0x00;
/// Serial console interface.
pub const ITF_ID_SERIAL: u8 = 0x01;
/// LoRaWAN interface using activation by personalisation.
pub const ITF_ID_LORAWAN_ABP: u8 = 0x02;
/// LoRaWAN interface using over-the-air activation.
pub const ITF_ID_LORAWAN_OTAA: u8 = 0x03;
/// DASH7 session interface.
pub const ITF_ID_D7: u8 = 0xD7;

/// Maximum encoded size of an interface config body.
pub const ITF_CONFIG_SIZE: usize = 43;
/// Maximum encoded size of an interface status body.
pub const ITF_STATUS_SIZE: usize = 40;

/// A session addressee: control byte, access class, 8-byte id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Addressee {
    pub ctrl: u8,
    pub access_class: u8,
    pub id: [u8; 8],
}

/// D7 session configuration (12 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct D7SessionConfig {
    pub qos: u8,
    pub dormant_timeout: u8,
    pub addressee: Addressee,
}

/// LoRaWAN ABP session configuration (42 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LorawanAbpConfig {
    pub request_ack: bool,
    pub application_port: u8,
    pub device_address: u32,
    pub network_id: u32,
    pub network_session_key: [u8; 16],
    pub application_session_key: [u8; 16],
}

/// LoRaWAN OTAA session configuration (34 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LorawanOtaaConfig {
    pub request_ack: bool,
    pub application_port: u8,
    pub device_eui: [u8; 8],
    pub join_eui: [u8; 8],
    pub application_key: [u8; 16],
}

/// Interface configuration: interface id plus a family-specific body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceConfig {
    pub itf_id: u8,
    pub body: InterfaceConfigBody,
}

/// Config body alternatives, selected by interface id on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceConfigBody {
    D7(D7SessionConfig),
    LorawanAbp(LorawanAbpConfig),
    LorawanOtaa(LorawanOtaaConfig),
    /// Opaque block for interface families this build does not type.
    Opaque(Vec<u8>),
}

impl InterfaceConfigBody {
    /// Encoded body size in bytes (excluding the itf_id byte and, for opaque
    /// bodies, the self-describing length operand).
    pub fn encoded_len(&self) -> usize {
        match self {
            InterfaceConfigBody::D7(_) => 12,
            InterfaceConfigBody::LorawanAbp(_) => 42,
            InterfaceConfigBody::LorawanOtaa(_) => 34,
            InterfaceConfigBody::Opaque(raw) => raw.len(),
        }
    }
}

impl InterfaceConfig {
    pub fn d7(config: D7SessionConfig) -> Self {
        Self {
            itf_id: ITF_ID_D7,
            body: InterfaceConfigBody::D7(config),
        }
    }

    pub fn lorawan_abp(config: LorawanAbpConfig) -> Self {
        Self {
            itf_id: ITF_ID_LORAWAN_ABP,
            body: InterfaceConfigBody::LorawanAbp(config),
        }
    }

    pub fn lorawan_otaa(config: LorawanOtaaConfig) -> Self {
        Self {
            itf_id: ITF_ID_LORAWAN_OTAA,
            body: InterfaceConfigBody::LorawanOtaa(config),
        }
    }

    pub fn opaque(itf_id: u8, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            itf_id,
            body: InterfaceConfigBody::Opaque(raw.into()),
        }
    }
}

/// D7 session result (20 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct D7SessionResult {
    pub channel_header: u8,
    pub channel_index: u16,
    pub rx_level: u8,
    pub link_budget: u8,
    pub target_rx_level: u8,
    pub status: u8,
    pub fifo_token: u8,
    pub sequence_number: u8,
    pub response_to: u8,
    pub addressee: Addressee,
}

/// Wire size of a serialized [`D7SessionResult`].
pub const D7_SESSION_RESULT_SIZE: usize = 20;

/// Interface status: interface id, declared length, result body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceStatus {
    pub itf_id: u8,
    pub body: InterfaceStatusBody,
}

/// Status body alternatives, selected by interface id and declared length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceStatusBody {
    D7(D7SessionResult),
    Opaque(Vec<u8>),
}

impl InterfaceStatusBody {
    pub fn encoded_len(&self) -> usize {
        match self {
            InterfaceStatusBody::D7(_) => D7_SESSION_RESULT_SIZE,
            InterfaceStatusBody::Opaque(raw) => raw.len(),
        }
    }
}

impl InterfaceStatus {
    pub fn d7(result: D7SessionResult) -> Self {
        Self {
            itf_id: ITF_ID_D7,
            body: InterfaceStatusBody::D7(result),
        }
    }

    pub fn opaque(itf_id: u8, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            itf_id,
            body: InterfaceStatusBody::Opaque(raw.into()),
        }
    }
}
