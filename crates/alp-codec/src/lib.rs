//! Application Layer Protocol (ALP) wire codec.
//!
//! ALP is a compact, byte-oriented command language for small wireless sensor
//! nodes. A transmitted payload is a flat sequence of *actions*; every action
//! starts with a 1-byte control header (opcode + two context-dependent flags)
//! followed by opcode-specific operands:
//! - File operations (read/write/create/delete/... on a small remote filesystem)
//! - Control flow (queries, logic, forwarding to another interface)
//! - Session bookkeeping (request/response tags, interface status)
//!
//! Encoding appends actions to a [`bytes::BytesMut`]; decoding walks any
//! [`bytes::Buf`] one action at a time. Both directions are pure, synchronous
//! transformations over the caller-owned buffer.

pub mod action;
pub mod control;
pub mod cursor;
pub mod error;
pub mod fs;
pub mod interface;
pub mod length;
pub mod operand;
pub mod status;

pub use action::{
    append_action, append_create_new_file_action, append_forward_action,
    append_indirect_forward_action, append_interface_status_action,
    append_read_file_data_action, append_response_tag_action, append_return_file_data_action,
    append_status_action, append_tag_request_action, append_write_file_data_action,
    expected_response_length, parse_action, peek_operation, Action, RegularFlags, StatusOperand,
};
pub use control::{Control, Operation, Regular, TagRequest, TagResponse, OPERATION_MASK};
pub use error::{AlpError, Result};
pub use fs::{FileHeader, StorageClass, FILE_HEADER_SIZE};
pub use interface::{
    Addressee, D7SessionConfig, D7SessionResult, InterfaceConfig, InterfaceConfigBody,
    InterfaceStatus, InterfaceStatusBody, LorawanAbpConfig, LorawanOtaaConfig,
    D7_SESSION_RESULT_SIZE, ITF_CONFIG_SIZE, ITF_ID_D7, ITF_ID_HOST, ITF_ID_LORAWAN_ABP,
    ITF_ID_LORAWAN_OTAA, ITF_ID_SERIAL, ITF_STATUS_SIZE,
};
pub use length::{
    append_length_operand, length_operand_coded_length, parse_length_operand, MAX_LENGTH_OPERAND,
};
pub use operand::{
    append_file_data, append_file_offset, append_file_properties, append_interface_config,
    append_interface_status, append_permission, append_query, parse_file_data, parse_file_offset,
    parse_file_properties, parse_interface_config, parse_interface_status, parse_permission,
    parse_query, CompareType, FileData, FileOffset, FileProperties, Permission, Query,
    FILE_OFFSET_SIZE, PAYLOAD_MAX_SIZE, PERMISSION_ID_DASH7,
};
pub use status::AlpStatus;
