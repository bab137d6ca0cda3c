//! Composite operand codecs.
//!
//! Each operand exposes an `append_*` routine writing into a [`BytesMut`] and
//! a symmetric `parse_*` consuming from any [`Buf`]. Parsers check remaining
//! length before every fixed-width field and propagate `TruncatedInput` /
//! `ValueTooLarge` from length-operand sub-reads, so a failed parse never
//! reads past the cursor end.

use bytes::{Buf, BufMut, BytesMut};

use crate::cursor;
use crate::error::{AlpError, Result};
use crate::fs::{FileHeader, FILE_HEADER_SIZE};
use crate::interface::{
    Addressee, D7SessionConfig, D7SessionResult, InterfaceConfig, InterfaceConfigBody,
    InterfaceStatus, InterfaceStatusBody, LorawanAbpConfig, LorawanOtaaConfig,
    D7_SESSION_RESULT_SIZE, ITF_CONFIG_SIZE, ITF_ID_D7, ITF_ID_LORAWAN_ABP, ITF_ID_LORAWAN_OTAA,
    ITF_STATUS_SIZE,
};
use crate::length::{append_length_operand, parse_length_operand};

/// Wire size of a file offset operand: file id + 4-byte offset.
pub const FILE_OFFSET_SIZE: usize = 5;

/// Maximum inline file-data payload, bounded by the transport maximum.
pub const PAYLOAD_MAX_SIZE: usize = 255;

/// Permission scheme id for a DASH7 16-byte key.
pub const PERMISSION_ID_DASH7: u8 = 0x42;

/// File offset operand. The offset is always transmitted full-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileOffset {
    pub file_id: u8,
    pub offset: u32,
}

/// File data operand: offset plus inline bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub offset: FileOffset,
    pub data: Vec<u8>,
}

/// File properties operand: file id plus the filesystem header record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileProperties {
    pub file_id: u8,
    pub header: FileHeader,
}

pub fn append_file_offset(dst: &mut BytesMut, offset: &FileOffset) {
    dst.put_u8(offset.file_id);
    dst.put_u32(offset.offset);
}

pub fn parse_file_offset(src: &mut impl Buf) -> Result<FileOffset> {
    Ok(FileOffset {
        file_id: cursor::take_u8(src)?,
        offset: cursor::take_u32(src)?,
    })
}

/// Append a file data operand: offset, self-describing length, raw bytes.
pub fn append_file_data(dst: &mut BytesMut, data: &FileData) -> Result<()> {
    if data.data.len() > PAYLOAD_MAX_SIZE {
        return Err(AlpError::PayloadTooLarge {
            size: data.data.len(),
            max: PAYLOAD_MAX_SIZE,
        });
    }
    append_file_offset(dst, &data.offset);
    append_length_operand(dst, data.data.len() as u32)?;
    dst.put_slice(&data.data);
    Ok(())
}

pub fn parse_file_data(src: &mut impl Buf) -> Result<FileData> {
    let offset = parse_file_offset(src)?;
    let length = parse_length_operand(src)? as usize;
    if length > PAYLOAD_MAX_SIZE {
        return Err(AlpError::PayloadTooLarge {
            size: length,
            max: PAYLOAD_MAX_SIZE,
        });
    }
    let data = cursor::take_vec(src, length)?;
    Ok(FileData { offset, data })
}

pub fn append_file_properties(dst: &mut BytesMut, properties: &FileProperties) {
    dst.put_u8(properties.file_id);
    dst.put_slice(&properties.header.to_bytes());
}

pub fn parse_file_properties(src: &mut impl Buf) -> Result<FileProperties> {
    let file_id = cursor::take_u8(src)?;
    let raw: [u8; FILE_HEADER_SIZE] = cursor::take_array(src)?;
    Ok(FileProperties {
        file_id,
        header: FileHeader::from_bytes(raw),
    })
}

/// Arithmetic comparison selector carried in a query code byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareType {
    Inequality = 0,
    Equality = 1,
    LessThan = 2,
    LessThanOrEqual = 3,
    GreaterThan = 4,
    GreaterThanOrEqual = 5,
}

const QUERY_TYPE_ARITH: u8 = 0b100 << 5;
const QUERY_MASK_FLAG: u8 = 1 << 4;

/// Query operand: code byte, compare value (optionally masked), file offset.
///
/// Evaluation against file contents is the caller's concern; the codec only
/// carries the operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Raw code byte: type in bits 7-5, mask flag in bit 4, comparison
    /// parameters in the low bits. The mask flag is kept consistent with
    /// `mask` on encode.
    pub code: u8,
    pub mask: Option<Vec<u8>>,
    pub value: Vec<u8>,
    pub file_offset: FileOffset,
}

impl Query {
    /// Arithmetic comparison of file contents with `value`.
    pub fn arithmetic(
        compare: CompareType,
        value: Vec<u8>,
        mask: Option<Vec<u8>>,
        file_offset: FileOffset,
    ) -> Self {
        let mut code = QUERY_TYPE_ARITH | compare as u8;
        if mask.is_some() {
            code |= QUERY_MASK_FLAG;
        }
        Self {
            code,
            mask,
            value,
            file_offset,
        }
    }
}

pub fn append_query(dst: &mut BytesMut, query: &Query) -> Result<()> {
    // Same bounds the decoder enforces, so emitted bytes always parse back.
    if query.value.len() > PAYLOAD_MAX_SIZE {
        return Err(AlpError::PayloadTooLarge {
            size: query.value.len(),
            max: PAYLOAD_MAX_SIZE,
        });
    }
    if let Some(mask) = &query.mask {
        if mask.len() != query.value.len() {
            return Err(AlpError::MaskLengthMismatch {
                mask: mask.len(),
                value: query.value.len(),
            });
        }
    }
    let mut code = query.code & !QUERY_MASK_FLAG;
    if query.mask.is_some() {
        code |= QUERY_MASK_FLAG;
    }
    dst.put_u8(code);
    append_length_operand(dst, query.value.len() as u32)?;
    if let Some(mask) = &query.mask {
        dst.put_slice(mask);
    }
    dst.put_slice(&query.value);
    append_file_offset(dst, &query.file_offset);
    Ok(())
}

pub fn parse_query(src: &mut impl Buf) -> Result<Query> {
    let code = cursor::take_u8(src)?;
    let length = parse_length_operand(src)? as usize;
    if length > PAYLOAD_MAX_SIZE {
        return Err(AlpError::PayloadTooLarge {
            size: length,
            max: PAYLOAD_MAX_SIZE,
        });
    }
    let mask = if code & QUERY_MASK_FLAG != 0 {
        Some(cursor::take_vec(src, length)?)
    } else {
        None
    };
    let value = cursor::take_vec(src, length)?;
    let file_offset = parse_file_offset(src)?;
    Ok(Query {
        code,
        mask,
        value,
        file_offset,
    })
}

/// Permission operand: requested level plus a DASH7 16-byte key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub level: u8,
    pub key: [u8; 16],
}

pub fn append_permission(dst: &mut BytesMut, permission: &Permission) {
    dst.put_u8(permission.level);
    dst.put_u8(PERMISSION_ID_DASH7);
    dst.put_slice(&permission.key);
}

pub fn parse_permission(src: &mut impl Buf) -> Result<Permission> {
    let level = cursor::take_u8(src)?;
    let id = cursor::take_u8(src)?;
    if id != PERMISSION_ID_DASH7 {
        return Err(AlpError::UnsupportedPermission(id));
    }
    let key = cursor::take_array(src)?;
    Ok(Permission { level, key })
}

fn append_addressee(dst: &mut BytesMut, addressee: &Addressee) {
    dst.put_u8(addressee.ctrl);
    dst.put_u8(addressee.access_class);
    dst.put_slice(&addressee.id);
}

fn parse_addressee(src: &mut impl Buf) -> Result<Addressee> {
    Ok(Addressee {
        ctrl: cursor::take_u8(src)?,
        access_class: cursor::take_u8(src)?,
        id: cursor::take_array(src)?,
    })
}

/// Append an interface config operand.
///
/// Known interface families (D7, LoRaWAN ABP/OTAA) are written as their typed
/// fixed-layout records; anything else is written as a length operand followed
/// by the opaque block. Construct values via [`InterfaceConfig`] constructors
/// so the body variant matches the interface id.
pub fn append_interface_config(dst: &mut BytesMut, config: &InterfaceConfig) -> Result<()> {
    dst.put_u8(config.itf_id);
    match &config.body {
        InterfaceConfigBody::D7(d7) => {
            debug_assert_eq!(config.itf_id, ITF_ID_D7);
            dst.put_u8(d7.qos);
            dst.put_u8(d7.dormant_timeout);
            append_addressee(dst, &d7.addressee);
        }
        InterfaceConfigBody::LorawanAbp(abp) => {
            debug_assert_eq!(config.itf_id, ITF_ID_LORAWAN_ABP);
            dst.put_u8(abp.request_ack as u8);
            dst.put_u8(abp.application_port);
            dst.put_u32(abp.device_address);
            dst.put_u32(abp.network_id);
            dst.put_slice(&abp.network_session_key);
            dst.put_slice(&abp.application_session_key);
        }
        InterfaceConfigBody::LorawanOtaa(otaa) => {
            debug_assert_eq!(config.itf_id, ITF_ID_LORAWAN_OTAA);
            dst.put_u8(otaa.request_ack as u8);
            dst.put_u8(otaa.application_port);
            dst.put_slice(&otaa.device_eui);
            dst.put_slice(&otaa.join_eui);
            dst.put_slice(&otaa.application_key);
        }
        InterfaceConfigBody::Opaque(raw) => {
            if raw.len() > ITF_CONFIG_SIZE {
                return Err(AlpError::PayloadTooLarge {
                    size: raw.len(),
                    max: ITF_CONFIG_SIZE,
                });
            }
            append_length_operand(dst, raw.len() as u32)?;
            dst.put_slice(raw);
        }
    }
    Ok(())
}

pub fn parse_interface_config(src: &mut impl Buf) -> Result<InterfaceConfig> {
    let itf_id = cursor::take_u8(src)?;
    let body = match itf_id {
        ITF_ID_D7 => InterfaceConfigBody::D7(D7SessionConfig {
            qos: cursor::take_u8(src)?,
            dormant_timeout: cursor::take_u8(src)?,
            addressee: parse_addressee(src)?,
        }),
        ITF_ID_LORAWAN_ABP => InterfaceConfigBody::LorawanAbp(LorawanAbpConfig {
            request_ack: cursor::take_u8(src)? != 0,
            application_port: cursor::take_u8(src)?,
            device_address: cursor::take_u32(src)?,
            network_id: cursor::take_u32(src)?,
            network_session_key: cursor::take_array(src)?,
            application_session_key: cursor::take_array(src)?,
        }),
        ITF_ID_LORAWAN_OTAA => InterfaceConfigBody::LorawanOtaa(LorawanOtaaConfig {
            request_ack: cursor::take_u8(src)? != 0,
            application_port: cursor::take_u8(src)?,
            device_eui: cursor::take_array(src)?,
            join_eui: cursor::take_array(src)?,
            application_key: cursor::take_array(src)?,
        }),
        _ => {
            let length = parse_length_operand(src)? as usize;
            if length > ITF_CONFIG_SIZE {
                return Err(AlpError::PayloadTooLarge {
                    size: length,
                    max: ITF_CONFIG_SIZE,
                });
            }
            InterfaceConfigBody::Opaque(cursor::take_vec(src, length)?)
        }
    };
    Ok(InterfaceConfig { itf_id, body })
}

/// Append an interface status operand: itf id, declared length, result body.
pub fn append_interface_status(dst: &mut BytesMut, status: &InterfaceStatus) -> Result<()> {
    let len = status.body.encoded_len();
    if len > ITF_STATUS_SIZE {
        return Err(AlpError::PayloadTooLarge {
            size: len,
            max: ITF_STATUS_SIZE,
        });
    }
    dst.put_u8(status.itf_id);
    dst.put_u8(len as u8);
    match &status.body {
        InterfaceStatusBody::D7(d7) => {
            debug_assert_eq!(status.itf_id, ITF_ID_D7);
            dst.put_u8(d7.channel_header);
            dst.put_u16(d7.channel_index);
            dst.put_u8(d7.rx_level);
            dst.put_u8(d7.link_budget);
            dst.put_u8(d7.target_rx_level);
            dst.put_u8(d7.status);
            dst.put_u8(d7.fifo_token);
            dst.put_u8(d7.sequence_number);
            dst.put_u8(d7.response_to);
            append_addressee(dst, &d7.addressee);
        }
        InterfaceStatusBody::Opaque(raw) => dst.put_slice(raw),
    }
    Ok(())
}

/// Parse an interface status operand, consuming exactly the declared length
/// so subsequent actions stay aligned.
pub fn parse_interface_status(src: &mut impl Buf) -> Result<InterfaceStatus> {
    let itf_id = cursor::take_u8(src)?;
    let len = cursor::take_u8(src)? as usize;
    if len > ITF_STATUS_SIZE {
        return Err(AlpError::PayloadTooLarge {
            size: len,
            max: ITF_STATUS_SIZE,
        });
    }
    let body = if itf_id == ITF_ID_D7 && len == D7_SESSION_RESULT_SIZE {
        InterfaceStatusBody::D7(D7SessionResult {
            channel_header: cursor::take_u8(src)?,
            channel_index: cursor::take_u16(src)?,
            rx_level: cursor::take_u8(src)?,
            link_budget: cursor::take_u8(src)?,
            target_rx_level: cursor::take_u8(src)?,
            status: cursor::take_u8(src)?,
            fifo_token: cursor::take_u8(src)?,
            sequence_number: cursor::take_u8(src)?,
            response_to: cursor::take_u8(src)?,
            addressee: parse_addressee(src)?,
        })
    } else {
        InterfaceStatusBody::Opaque(cursor::take_vec(src, len)?)
    };
    Ok(InterfaceStatus { itf_id, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::ITF_ID_SERIAL;

    #[test]
    fn file_offset_is_five_fixed_bytes() {
        let mut buf = BytesMut::new();
        append_file_offset(
            &mut buf,
            &FileOffset {
                file_id: 5,
                offset: 0x0102_0304,
            },
        );
        assert_eq!(buf.as_ref(), &[0x05, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(buf.len(), FILE_OFFSET_SIZE);

        let mut src = buf.freeze();
        let parsed = parse_file_offset(&mut src).unwrap();
        assert_eq!(parsed.file_id, 5);
        assert_eq!(parsed.offset, 0x0102_0304);
    }

    #[test]
    fn file_data_roundtrip_and_bound() {
        let data = FileData {
            offset: FileOffset {
                file_id: 9,
                offset: 128,
            },
            data: vec![0xAB; 70],
        };
        let mut buf = BytesMut::new();
        append_file_data(&mut buf, &data).unwrap();
        // 70 needs a 2-byte length operand.
        assert_eq!(buf.len(), FILE_OFFSET_SIZE + 2 + 70);
        let mut src = buf.freeze();
        assert_eq!(parse_file_data(&mut src).unwrap(), data);

        let oversized = FileData {
            offset: FileOffset::default(),
            data: vec![0; PAYLOAD_MAX_SIZE + 1],
        };
        let mut buf = BytesMut::new();
        assert!(matches!(
            append_file_data(&mut buf, &oversized),
            Err(AlpError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn file_data_decode_rejects_oversized_declared_length() {
        let mut buf = BytesMut::new();
        append_file_offset(&mut buf, &FileOffset::default());
        crate::length::append_length_operand(&mut buf, 300).unwrap();
        let mut src = buf.freeze();
        assert!(matches!(
            parse_file_data(&mut src),
            Err(AlpError::PayloadTooLarge { size: 300, .. })
        ));
    }

    #[test]
    fn query_roundtrip_with_and_without_mask() {
        let offset = FileOffset {
            file_id: 3,
            offset: 16,
        };
        let plain = Query::arithmetic(CompareType::Equality, vec![1, 2, 3], None, offset);
        let mut buf = BytesMut::new();
        append_query(&mut buf, &plain).unwrap();
        let mut src = buf.freeze();
        assert_eq!(parse_query(&mut src).unwrap(), plain);

        let masked = Query::arithmetic(
            CompareType::GreaterThan,
            vec![1, 2, 3],
            Some(vec![0xFF, 0x0F, 0xF0]),
            offset,
        );
        let mut buf = BytesMut::new();
        append_query(&mut buf, &masked).unwrap();
        let mut src = buf.freeze();
        assert_eq!(parse_query(&mut src).unwrap(), masked);
    }

    #[test]
    fn query_encode_enforces_decoder_bounds() {
        let offset = FileOffset::default();

        let oversized = Query::arithmetic(
            CompareType::Equality,
            vec![0; PAYLOAD_MAX_SIZE + 1],
            None,
            offset,
        );
        let mut buf = BytesMut::new();
        assert_eq!(
            append_query(&mut buf, &oversized),
            Err(AlpError::PayloadTooLarge {
                size: PAYLOAD_MAX_SIZE + 1,
                max: PAYLOAD_MAX_SIZE
            })
        );

        let misaligned = Query::arithmetic(
            CompareType::Equality,
            vec![1, 2, 3],
            Some(vec![0xFF]),
            offset,
        );
        let mut buf = BytesMut::new();
        assert_eq!(
            append_query(&mut buf, &misaligned),
            Err(AlpError::MaskLengthMismatch { mask: 1, value: 3 })
        );

        // The largest legal value still encodes and parses back.
        let maximal = Query::arithmetic(
            CompareType::Equality,
            vec![0xAB; PAYLOAD_MAX_SIZE],
            None,
            offset,
        );
        let mut buf = BytesMut::new();
        append_query(&mut buf, &maximal).unwrap();
        let mut src = buf.freeze();
        assert_eq!(parse_query(&mut src).unwrap(), maximal);
    }

    #[test]
    fn permission_rejects_unknown_scheme() {
        let permission = Permission {
            level: 1,
            key: [7; 16],
        };
        let mut buf = BytesMut::new();
        append_permission(&mut buf, &permission);
        let mut wire = buf.to_vec();
        assert_eq!(
            parse_permission(&mut wire.as_slice()).unwrap(),
            permission
        );

        wire[1] = 0x43;
        assert_eq!(
            parse_permission(&mut wire.as_slice()),
            Err(AlpError::UnsupportedPermission(0x43))
        );
    }

    #[test]
    fn d7_config_uses_fixed_typed_layout() {
        let config = InterfaceConfig::d7(D7SessionConfig {
            qos: 0x02,
            dormant_timeout: 0,
            addressee: Addressee {
                ctrl: 0x20,
                access_class: 0x11,
                id: [1, 2, 3, 4, 5, 6, 7, 8],
            },
        });
        let mut buf = BytesMut::new();
        append_interface_config(&mut buf, &config).unwrap();
        // itf_id + 12-byte session config, no length prefix.
        assert_eq!(buf.len(), 13);
        assert_eq!(buf[0], ITF_ID_D7);

        let mut src = buf.freeze();
        assert_eq!(parse_interface_config(&mut src).unwrap(), config);
    }

    #[test]
    fn lorawan_config_roundtrips() {
        let abp = InterfaceConfig::lorawan_abp(LorawanAbpConfig {
            request_ack: true,
            application_port: 2,
            device_address: 0x2601_1234,
            network_id: 0x13,
            network_session_key: [0xA5; 16],
            application_session_key: [0x5A; 16],
        });
        let mut buf = BytesMut::new();
        append_interface_config(&mut buf, &abp).unwrap();
        assert_eq!(buf.len(), 1 + 42);
        let mut src = buf.freeze();
        assert_eq!(parse_interface_config(&mut src).unwrap(), abp);

        let otaa = InterfaceConfig::lorawan_otaa(LorawanOtaaConfig {
            request_ack: false,
            application_port: 2,
            device_eui: [1; 8],
            join_eui: [2; 8],
            application_key: [3; 16],
        });
        let mut buf = BytesMut::new();
        append_interface_config(&mut buf, &otaa).unwrap();
        assert_eq!(buf.len(), 1 + 34);
        let mut src = buf.freeze();
        assert_eq!(parse_interface_config(&mut src).unwrap(), otaa);
    }

    #[test]
    fn unknown_interface_config_is_length_prefixed() {
        let config = InterfaceConfig::opaque(ITF_ID_SERIAL, vec![9, 8, 7]);
        let mut buf = BytesMut::new();
        append_interface_config(&mut buf, &config).unwrap();
        assert_eq!(buf.as_ref(), &[ITF_ID_SERIAL, 3, 9, 8, 7]);
        let mut src = buf.freeze();
        assert_eq!(parse_interface_config(&mut src).unwrap(), config);

        let oversized = InterfaceConfig::opaque(ITF_ID_SERIAL, vec![0; ITF_CONFIG_SIZE + 1]);
        let mut buf = BytesMut::new();
        assert!(matches!(
            append_interface_config(&mut buf, &oversized),
            Err(AlpError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn interface_status_consumes_declared_length_exactly() {
        let status = InterfaceStatus::d7(D7SessionResult {
            channel_header: 0x32,
            channel_index: 270,
            rx_level: 40,
            link_budget: 62,
            target_rx_level: 80,
            status: 0x01,
            fifo_token: 0xBE,
            sequence_number: 1,
            response_to: 0x20,
            addressee: Addressee {
                ctrl: 0x20,
                access_class: 0x01,
                id: [9; 8],
            },
        });
        let mut buf = BytesMut::new();
        append_interface_status(&mut buf, &status).unwrap();
        assert_eq!(buf.len(), 2 + D7_SESSION_RESULT_SIZE);
        assert_eq!(buf[1] as usize, D7_SESSION_RESULT_SIZE);

        // Trailing bytes after the operand must be left untouched.
        buf.put_u8(0xEE);
        let mut src = buf.freeze();
        assert_eq!(parse_interface_status(&mut src).unwrap(), status);
        assert_eq!(src.remaining(), 1);
    }

    #[test]
    fn opaque_status_for_unknown_interface() {
        let status = InterfaceStatus::opaque(0x42, vec![1, 2, 3, 4]);
        let mut buf = BytesMut::new();
        append_interface_status(&mut buf, &status).unwrap();
        assert_eq!(buf.as_ref(), &[0x42, 4, 1, 2, 3, 4]);
        let mut src = buf.freeze();
        assert_eq!(parse_interface_status(&mut src).unwrap(), status);
    }

    #[test]
    fn truncated_operands_never_panic() {
        let data = FileData {
            offset: FileOffset {
                file_id: 1,
                offset: 2,
            },
            data: vec![1, 2, 3, 4],
        };
        let mut buf = BytesMut::new();
        append_file_data(&mut buf, &data).unwrap();
        let wire = buf.freeze();
        for cut in 0..wire.len() {
            let mut src = &wire[..cut];
            assert_eq!(parse_file_data(&mut src), Err(AlpError::TruncatedInput));
        }
    }
}
