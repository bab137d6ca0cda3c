//! Streaming action encoder/decoder.
//!
//! A composed command is a flat concatenation of actions. [`append_action`]
//! (and the per-opcode convenience appenders) write one action into a
//! [`BytesMut`]; [`parse_action`] consumes exactly one action from any
//! [`Buf`], so decoding a stream is just repeated calls until the cursor is
//! empty.

use bytes::{Buf, BufMut, BytesMut};

use crate::control::{Control, Operation, OPERATION_MASK};
use crate::cursor;
use crate::error::{AlpError, Result};
use crate::fs::{FileHeader, StorageClass};
use crate::interface::{InterfaceConfig, InterfaceStatus};
use crate::length::{append_length_operand, length_operand_coded_length, parse_length_operand};
use crate::operand::{
    append_file_data, append_file_offset, append_file_properties, append_interface_config,
    append_interface_status, append_permission, append_query, parse_file_data, parse_file_offset,
    parse_file_properties, parse_interface_config, parse_interface_status, parse_permission,
    parse_query, FileData, FileOffset, FileProperties, Permission, Query, FILE_OFFSET_SIZE,
};
use crate::status::AlpStatus;

/// Regular-view flag pair carried by most actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegularFlags {
    pub response_requested: bool,
    pub group: bool,
}

impl RegularFlags {
    pub fn response() -> Self {
        Self {
            response_requested: true,
            group: false,
        }
    }
}

/// Payload of a status action: an action status code or an interface status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOperand {
    Action(AlpStatus),
    Interface(InterfaceStatus),
}

/// One decoded ALP action.
///
/// Opcodes whose full semantics need filesystem or session context (queries,
/// permission checks, execute) are decoded only as far as their operand
/// bytes; interpreting those values is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Nop {
        flags: RegularFlags,
    },
    ReadFileData {
        flags: RegularFlags,
        offset: FileOffset,
        length: u32,
    },
    ReadFileProperties {
        flags: RegularFlags,
        file_id: u8,
    },
    WriteFileData {
        flags: RegularFlags,
        data: FileData,
    },
    WriteFileDataFlush {
        flags: RegularFlags,
        data: FileData,
    },
    WriteFileProperties {
        flags: RegularFlags,
        file: FileProperties,
    },
    ActionQuery {
        flags: RegularFlags,
        query: Query,
    },
    BreakQuery {
        flags: RegularFlags,
        query: Query,
    },
    PermissionRequest {
        flags: RegularFlags,
        permission: Permission,
    },
    VerifyChecksum {
        flags: RegularFlags,
        query: Query,
    },
    ExistFile {
        flags: RegularFlags,
        file_id: u8,
    },
    CreateFile {
        flags: RegularFlags,
        file: FileProperties,
    },
    DeleteFile {
        flags: RegularFlags,
        file_id: u8,
    },
    RestoreFile {
        flags: RegularFlags,
        file_id: u8,
    },
    FlushFile {
        flags: RegularFlags,
        file_id: u8,
    },
    OpenFile {
        flags: RegularFlags,
        file_id: u8,
    },
    CloseFile {
        flags: RegularFlags,
        file_id: u8,
    },
    CopyFile {
        flags: RegularFlags,
        source_file_id: u8,
        destination_file_id: u8,
    },
    ExecuteFile {
        flags: RegularFlags,
        file_id: u8,
    },
    ReturnFileData {
        flags: RegularFlags,
        data: FileData,
    },
    ReturnFileProperties {
        flags: RegularFlags,
        file: FileProperties,
    },
    Status {
        status: StatusOperand,
    },
    ResponseTag {
        completed: bool,
        error: bool,
        tag_id: u8,
    },
    Chunk {
        flags: RegularFlags,
    },
    Logic {
        flags: RegularFlags,
    },
    Forward {
        flags: RegularFlags,
        config: InterfaceConfig,
    },
    IndirectForward {
        interface_file_id: u8,
        overload_config: Option<Vec<u8>>,
    },
    RequestTag {
        respond_when_completed: bool,
        tag_id: u8,
    },
}

impl Action {
    /// The opcode this action carries on the wire.
    pub fn operation(&self) -> Operation {
        match self {
            Action::Nop { .. } => Operation::Nop,
            Action::ReadFileData { .. } => Operation::ReadFileData,
            Action::ReadFileProperties { .. } => Operation::ReadFileProperties,
            Action::WriteFileData { .. } => Operation::WriteFileData,
            Action::WriteFileDataFlush { .. } => Operation::WriteFileDataFlush,
            Action::WriteFileProperties { .. } => Operation::WriteFileProperties,
            Action::ActionQuery { .. } => Operation::ActionQuery,
            Action::BreakQuery { .. } => Operation::BreakQuery,
            Action::PermissionRequest { .. } => Operation::PermissionRequest,
            Action::VerifyChecksum { .. } => Operation::VerifyChecksum,
            Action::ExistFile { .. } => Operation::ExistFile,
            Action::CreateFile { .. } => Operation::CreateFile,
            Action::DeleteFile { .. } => Operation::DeleteFile,
            Action::RestoreFile { .. } => Operation::RestoreFile,
            Action::FlushFile { .. } => Operation::FlushFile,
            Action::OpenFile { .. } => Operation::OpenFile,
            Action::CloseFile { .. } => Operation::CloseFile,
            Action::CopyFile { .. } => Operation::CopyFile,
            Action::ExecuteFile { .. } => Operation::ExecuteFile,
            Action::ReturnFileData { .. } => Operation::ReturnFileData,
            Action::ReturnFileProperties { .. } => Operation::ReturnFileProperties,
            Action::Status { .. } => Operation::Status,
            Action::ResponseTag { .. } => Operation::ResponseTag,
            Action::Chunk { .. } => Operation::Chunk,
            Action::Logic { .. } => Operation::Logic,
            Action::Forward { .. } => Operation::Forward,
            Action::IndirectForward { .. } => Operation::IndirectForward,
            Action::RequestTag { .. } => Operation::RequestTag,
        }
    }
}

fn regular_control(operation: Operation, flags: RegularFlags) -> Control {
    Control::pack(operation, flags.response_requested, flags.group)
}

/// Append one logical action, selecting the minimal wire representation.
pub fn append_action(dst: &mut BytesMut, action: &Action) -> Result<()> {
    match action {
        Action::Nop { flags }
        | Action::Chunk { flags }
        | Action::Logic { flags } => {
            dst.put_u8(regular_control(action.operation(), *flags).raw());
        }
        Action::ReadFileData {
            flags,
            offset,
            length,
        } => {
            dst.put_u8(regular_control(Operation::ReadFileData, *flags).raw());
            append_file_offset(dst, offset);
            append_length_operand(dst, *length)?;
        }
        Action::ReadFileProperties { flags, file_id }
        | Action::ExistFile { flags, file_id }
        | Action::DeleteFile { flags, file_id }
        | Action::RestoreFile { flags, file_id }
        | Action::FlushFile { flags, file_id }
        | Action::OpenFile { flags, file_id }
        | Action::CloseFile { flags, file_id }
        | Action::ExecuteFile { flags, file_id } => {
            dst.put_u8(regular_control(action.operation(), *flags).raw());
            dst.put_u8(*file_id);
        }
        Action::WriteFileData { flags, data } | Action::WriteFileDataFlush { flags, data } => {
            dst.put_u8(regular_control(action.operation(), *flags).raw());
            append_file_data(dst, data)?;
        }
        Action::ReturnFileData { flags, data } => {
            dst.put_u8(regular_control(Operation::ReturnFileData, *flags).raw());
            append_file_data(dst, data)?;
        }
        Action::WriteFileProperties { flags, file }
        | Action::CreateFile { flags, file }
        | Action::ReturnFileProperties { flags, file } => {
            dst.put_u8(regular_control(action.operation(), *flags).raw());
            append_file_properties(dst, file);
        }
        Action::ActionQuery { flags, query }
        | Action::BreakQuery { flags, query }
        | Action::VerifyChecksum { flags, query } => {
            dst.put_u8(regular_control(action.operation(), *flags).raw());
            append_query(dst, query)?;
        }
        Action::PermissionRequest { flags, permission } => {
            dst.put_u8(regular_control(Operation::PermissionRequest, *flags).raw());
            append_permission(dst, permission);
        }
        Action::CopyFile {
            flags,
            source_file_id,
            destination_file_id,
        } => {
            dst.put_u8(regular_control(Operation::CopyFile, *flags).raw());
            dst.put_u8(*source_file_id);
            dst.put_u8(*destination_file_id);
        }
        Action::Status { status } => match status {
            StatusOperand::Action(code) => {
                dst.put_u8(Control::pack(Operation::Status, false, false).raw());
                dst.put_u8(*code as u8);
            }
            StatusOperand::Interface(itf_status) => {
                dst.put_u8(Control::pack(Operation::Status, true, false).raw());
                append_interface_status(dst, itf_status)?;
            }
        },
        Action::ResponseTag {
            completed,
            error,
            tag_id,
        } => {
            dst.put_u8(Control::pack(Operation::ResponseTag, *error, *completed).raw());
            dst.put_u8(*tag_id);
        }
        Action::Forward { flags, config } => {
            dst.put_u8(regular_control(Operation::Forward, *flags).raw());
            append_interface_config(dst, config)?;
        }
        Action::IndirectForward {
            interface_file_id,
            overload_config,
        } => {
            match overload_config {
                Some(config) => {
                    // Same bound the decoder enforces; never emit bytes the
                    // peer must reject.
                    if config.len() > crate::interface::ITF_CONFIG_SIZE {
                        return Err(AlpError::PayloadTooLarge {
                            size: config.len(),
                            max: crate::interface::ITF_CONFIG_SIZE,
                        });
                    }
                    dst.put_u8(Control::pack(Operation::IndirectForward, false, true).raw());
                    dst.put_u8(*interface_file_id);
                    append_length_operand(dst, config.len() as u32)?;
                    dst.put_slice(config);
                }
                None => {
                    dst.put_u8(Control::pack(Operation::IndirectForward, false, false).raw());
                    dst.put_u8(*interface_file_id);
                }
            }
        }
        Action::RequestTag {
            respond_when_completed,
            tag_id,
        } => {
            dst.put_u8(Control::pack(Operation::RequestTag, false, *respond_when_completed).raw());
            dst.put_u8(*tag_id);
        }
    }
    Ok(())
}

/// Consume and decode the next action from the cursor.
///
/// Fails with [`AlpError::UnknownOperation`] for undefined opcodes and
/// [`AlpError::TruncatedInput`] when the cursor runs dry mid-action; it never
/// reads past the current action's own bytes.
pub fn parse_action(src: &mut impl Buf) -> Result<Action> {
    let raw = cursor::take_u8(src)?;
    let control =
        Control::from_raw(raw).map_err(|_| AlpError::UnknownOperation(raw & OPERATION_MASK))?;
    let action = parse_action_body(control, src)?;
    tracing::trace!(operation = ?action.operation(), "parsed action");
    Ok(action)
}

fn parse_action_body(control: Control, src: &mut impl Buf) -> Result<Action> {
    let regular = control.regular();
    let flags = RegularFlags {
        response_requested: regular.response_requested,
        group: regular.group,
    };
    Ok(match control.operation() {
        Operation::Nop => Action::Nop { flags },
        Operation::ReadFileData => Action::ReadFileData {
            flags,
            offset: parse_file_offset(src)?,
            length: parse_length_operand(src)?,
        },
        Operation::ReadFileProperties => Action::ReadFileProperties {
            flags,
            file_id: cursor::take_u8(src)?,
        },
        Operation::WriteFileData => Action::WriteFileData {
            flags,
            data: parse_file_data(src)?,
        },
        Operation::WriteFileDataFlush => Action::WriteFileDataFlush {
            flags,
            data: parse_file_data(src)?,
        },
        Operation::WriteFileProperties => Action::WriteFileProperties {
            flags,
            file: parse_file_properties(src)?,
        },
        Operation::ActionQuery => Action::ActionQuery {
            flags,
            query: parse_query(src)?,
        },
        Operation::BreakQuery => Action::BreakQuery {
            flags,
            query: parse_query(src)?,
        },
        Operation::PermissionRequest => Action::PermissionRequest {
            flags,
            permission: parse_permission(src)?,
        },
        Operation::VerifyChecksum => Action::VerifyChecksum {
            flags,
            query: parse_query(src)?,
        },
        Operation::ExistFile => Action::ExistFile {
            flags,
            file_id: cursor::take_u8(src)?,
        },
        Operation::CreateFile => Action::CreateFile {
            flags,
            file: parse_file_properties(src)?,
        },
        Operation::DeleteFile => Action::DeleteFile {
            flags,
            file_id: cursor::take_u8(src)?,
        },
        Operation::RestoreFile => Action::RestoreFile {
            flags,
            file_id: cursor::take_u8(src)?,
        },
        Operation::FlushFile => Action::FlushFile {
            flags,
            file_id: cursor::take_u8(src)?,
        },
        Operation::OpenFile => Action::OpenFile {
            flags,
            file_id: cursor::take_u8(src)?,
        },
        Operation::CloseFile => Action::CloseFile {
            flags,
            file_id: cursor::take_u8(src)?,
        },
        Operation::CopyFile => Action::CopyFile {
            flags,
            source_file_id: cursor::take_u8(src)?,
            destination_file_id: cursor::take_u8(src)?,
        },
        Operation::ExecuteFile => Action::ExecuteFile {
            flags,
            file_id: cursor::take_u8(src)?,
        },
        Operation::ReturnFileData => Action::ReturnFileData {
            flags,
            data: parse_file_data(src)?,
        },
        Operation::ReturnFileProperties => Action::ReturnFileProperties {
            flags,
            file: parse_file_properties(src)?,
        },
        Operation::Status => {
            // Bit 6 selects interface status over a bare action status code.
            if regular.response_requested {
                Action::Status {
                    status: StatusOperand::Interface(parse_interface_status(src)?),
                }
            } else {
                Action::Status {
                    status: StatusOperand::Action(AlpStatus::try_from(cursor::take_u8(src)?)?),
                }
            }
        }
        Operation::ResponseTag => {
            let view = control.tag_response();
            Action::ResponseTag {
                completed: view.completed,
                error: view.error,
                tag_id: cursor::take_u8(src)?,
            }
        }
        Operation::Chunk => Action::Chunk { flags },
        Operation::Logic => Action::Logic { flags },
        Operation::Forward => Action::Forward {
            flags,
            config: parse_interface_config(src)?,
        },
        Operation::IndirectForward => {
            let overload = regular.group;
            let interface_file_id = cursor::take_u8(src)?;
            let overload_config = if overload {
                let length = parse_length_operand(src)? as usize;
                if length > crate::interface::ITF_CONFIG_SIZE {
                    return Err(AlpError::PayloadTooLarge {
                        size: length,
                        max: crate::interface::ITF_CONFIG_SIZE,
                    });
                }
                Some(cursor::take_vec(src, length)?)
            } else {
                None
            };
            Action::IndirectForward {
                interface_file_id,
                overload_config,
            }
        }
        Operation::RequestTag => {
            let view = control.tag_request();
            Action::RequestTag {
                respond_when_completed: view.respond_when_completed,
                tag_id: cursor::take_u8(src)?,
            }
        }
    })
}

/// Opcode of the first action in a composed command, without consuming it.
pub fn peek_operation(command: &[u8]) -> Result<Operation> {
    let raw = command.first().ok_or(AlpError::TruncatedInput)?;
    Operation::try_from(raw & OPERATION_MASK)
        .map_err(|_| AlpError::UnknownOperation(raw & OPERATION_MASK))
}

/// Total byte length a correctly-behaving responder would produce for the
/// composed command, used to size a receive buffer up front.
///
/// Each read-file-data action contributes a full return-file-data action; a
/// tag request with `respond_when_completed` contributes one response-tag
/// action. Forwarded operands are skipped and the scan continues.
pub fn expected_response_length(command: &[u8]) -> Result<u32> {
    let mut src = command;
    // Accumulated in u64: a handful of maximal reads already exceeds u32.
    let mut total: u64 = 0;
    while src.has_remaining() {
        match parse_action(&mut src)? {
            Action::ReadFileData { length, .. } => {
                let coded = length_operand_coded_length(length)? as u64;
                total += 1 + FILE_OFFSET_SIZE as u64 + coded + u64::from(length);
            }
            Action::RequestTag {
                respond_when_completed: true,
                ..
            } => {
                // Control byte + tag id of the eventual response tag action.
                total += 2;
            }
            _ => {}
        }
    }
    u32::try_from(total).map_err(|_| AlpError::ResponseLengthOverflow(total))
}

/// Append a tag request correlating subsequent actions with `tag_id`.
pub fn append_tag_request_action(
    dst: &mut BytesMut,
    tag_id: u8,
    respond_when_completed: bool,
) -> Result<()> {
    append_action(
        dst,
        &Action::RequestTag {
            respond_when_completed,
            tag_id,
        },
    )
}

/// Append a response tag reporting completion of the batch tagged `tag_id`.
pub fn append_response_tag_action(
    dst: &mut BytesMut,
    tag_id: u8,
    completed: bool,
    error: bool,
) -> Result<()> {
    append_action(
        dst,
        &Action::ResponseTag {
            completed,
            error,
            tag_id,
        },
    )
}

pub fn append_read_file_data_action(
    dst: &mut BytesMut,
    file_id: u8,
    offset: u32,
    length: u32,
    response_requested: bool,
    group: bool,
) -> Result<()> {
    append_action(
        dst,
        &Action::ReadFileData {
            flags: RegularFlags {
                response_requested,
                group,
            },
            offset: FileOffset { file_id, offset },
            length,
        },
    )
}

pub fn append_write_file_data_action(
    dst: &mut BytesMut,
    file_id: u8,
    offset: u32,
    data: &[u8],
    response_requested: bool,
    group: bool,
) -> Result<()> {
    append_action(
        dst,
        &Action::WriteFileData {
            flags: RegularFlags {
                response_requested,
                group,
            },
            data: FileData {
                offset: FileOffset { file_id, offset },
                data: data.to_vec(),
            },
        },
    )
}

pub fn append_return_file_data_action(
    dst: &mut BytesMut,
    file_id: u8,
    offset: u32,
    data: &[u8],
) -> Result<()> {
    append_action(
        dst,
        &Action::ReturnFileData {
            flags: RegularFlags::default(),
            data: FileData {
                offset: FileOffset { file_id, offset },
                data: data.to_vec(),
            },
        },
    )
}

pub fn append_create_new_file_action(
    dst: &mut BytesMut,
    file_id: u8,
    length: u32,
    storage_class: StorageClass,
    response_requested: bool,
    group: bool,
) -> Result<()> {
    append_action(
        dst,
        &Action::CreateFile {
            flags: RegularFlags {
                response_requested,
                group,
            },
            file: FileProperties {
                file_id,
                header: FileHeader::for_new_file(length, storage_class),
            },
        },
    )
}

pub fn append_forward_action(dst: &mut BytesMut, config: &InterfaceConfig) -> Result<()> {
    append_action(
        dst,
        &Action::Forward {
            flags: RegularFlags::default(),
            config: config.clone(),
        },
    )
}

pub fn append_indirect_forward_action(
    dst: &mut BytesMut,
    interface_file_id: u8,
    overload_config: Option<&[u8]>,
) -> Result<()> {
    append_action(
        dst,
        &Action::IndirectForward {
            interface_file_id,
            overload_config: overload_config.map(<[u8]>::to_vec),
        },
    )
}

pub fn append_interface_status_action(dst: &mut BytesMut, status: &InterfaceStatus) -> Result<()> {
    append_action(
        dst,
        &Action::Status {
            status: StatusOperand::Interface(status.clone()),
        },
    )
}

/// Append an action-status action carrying a bare wire status code.
pub fn append_status_action(dst: &mut BytesMut, status: AlpStatus) -> Result<()> {
    append_action(
        dst,
        &Action::Status {
            status: StatusOperand::Action(status),
        },
    )
}
