//! The 1-byte action control header.
//!
//! Bits 0-5 carry the opcode; bits 6-7 carry two flags whose meaning depends
//! on the opcode. The three interpretations are modelled as pure accessor
//! views over the same packed byte, never as overlapping storage.

use crate::error::{AlpError, Result};

/// Mask selecting the opcode bits of a control byte.
pub const OPERATION_MASK: u8 = 0b0011_1111;

const BIT6: u8 = 1 << 6;
const BIT7: u8 = 1 << 7;

/// ALP operation opcodes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Nop = 0,
    ReadFileData = 1,
    ReadFileProperties = 2,
    WriteFileData = 4,
    WriteFileDataFlush = 5,
    WriteFileProperties = 6,
    ActionQuery = 8,
    BreakQuery = 9,
    PermissionRequest = 10,
    VerifyChecksum = 11,
    ExistFile = 16,
    CreateFile = 17,
    DeleteFile = 18,
    RestoreFile = 19,
    FlushFile = 20,
    OpenFile = 21,
    CloseFile = 22,
    CopyFile = 23,
    ExecuteFile = 31,
    ReturnFileData = 32,
    ReturnFileProperties = 33,
    Status = 34,
    ResponseTag = 35,
    Chunk = 48,
    Logic = 49,
    Forward = 50,
    IndirectForward = 51,
    RequestTag = 52,
}

impl TryFrom<u8> for Operation {
    type Error = AlpError;

    fn try_from(value: u8) -> Result<Self> {
        use Operation::*;
        Ok(match value {
            0 => Nop,
            1 => ReadFileData,
            2 => ReadFileProperties,
            4 => WriteFileData,
            5 => WriteFileDataFlush,
            6 => WriteFileProperties,
            8 => ActionQuery,
            9 => BreakQuery,
            10 => PermissionRequest,
            11 => VerifyChecksum,
            16 => ExistFile,
            17 => CreateFile,
            18 => DeleteFile,
            19 => RestoreFile,
            20 => FlushFile,
            21 => OpenFile,
            22 => CloseFile,
            23 => CopyFile,
            31 => ExecuteFile,
            32 => ReturnFileData,
            33 => ReturnFileProperties,
            34 => Status,
            35 => ResponseTag,
            48 => Chunk,
            49 => Logic,
            50 => Forward,
            51 => IndirectForward,
            52 => RequestTag,
            other => return Err(AlpError::InvalidOpcode(other)),
        })
    }
}

/// The packed control byte preceding every action's operands.
///
/// Bit positions are fixed on the wire; only the flag *names* change with the
/// interpretation context ([`Regular`], [`TagRequest`], [`TagResponse`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control(u8);

impl Control {
    /// Pack an opcode and the two context flags (bit 6, bit 7).
    pub fn pack(operation: Operation, bit6: bool, bit7: bool) -> Self {
        let mut raw = operation as u8;
        if bit6 {
            raw |= BIT6;
        }
        if bit7 {
            raw |= BIT7;
        }
        Self(raw)
    }

    /// Unpack a wire byte into `(operation, bit6, bit7)`.
    ///
    /// Fails with [`AlpError::InvalidOpcode`] if the low 6 bits are not a
    /// defined operation.
    pub fn unpack(raw: u8) -> Result<(Operation, bool, bool)> {
        let operation = Operation::try_from(raw & OPERATION_MASK)?;
        Ok((operation, raw & BIT6 != 0, raw & BIT7 != 0))
    }

    /// Wrap an already-validated wire byte.
    pub fn from_raw(raw: u8) -> Result<Self> {
        Operation::try_from(raw & OPERATION_MASK)?;
        Ok(Self(raw))
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn operation(self) -> Operation {
        // Validated at construction; the mask keeps the expect unreachable.
        Operation::try_from(self.0 & OPERATION_MASK).expect("control byte validated on construction")
    }

    /// Interpret bits 6-7 as a regular action's flags.
    pub fn regular(self) -> Regular {
        Regular {
            operation: self.operation(),
            response_requested: self.0 & BIT6 != 0,
            group: self.0 & BIT7 != 0,
        }
    }

    /// Interpret bit 7 as a tag request's completion-response flag.
    pub fn tag_request(self) -> TagRequest {
        TagRequest {
            operation: self.operation(),
            respond_when_completed: self.0 & BIT7 != 0,
        }
    }

    /// Interpret bit 6 as a tag response's error flag, bit 7 as completed.
    pub fn tag_response(self) -> TagResponse {
        TagResponse {
            operation: self.operation(),
            error: self.0 & BIT6 != 0,
            completed: self.0 & BIT7 != 0,
        }
    }
}

/// Regular interpretation: bit 6 = response requested, bit 7 = group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regular {
    pub operation: Operation,
    pub response_requested: bool,
    pub group: bool,
}

impl Regular {
    pub fn pack(self) -> Control {
        Control::pack(self.operation, self.response_requested, self.group)
    }
}

/// Tag request interpretation: bit 7 = respond when completed, bit 6 reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRequest {
    pub operation: Operation,
    pub respond_when_completed: bool,
}

impl TagRequest {
    pub fn pack(self) -> Control {
        Control::pack(self.operation, false, self.respond_when_completed)
    }
}

/// Tag response interpretation: bit 6 = error, bit 7 = completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagResponse {
    pub operation: Operation,
    pub error: bool,
    pub completed: bool,
}

impl TagResponse {
    pub fn pack(self) -> Control {
        Control::pack(self.operation, self.error, self.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_places_opcode_in_low_six_bits() {
        let ctrl = Control::pack(Operation::ReadFileData, false, false);
        assert_eq!(ctrl.raw(), 0x01);

        let ctrl = Control::pack(Operation::RequestTag, false, true);
        assert_eq!(ctrl.raw(), 0x80 | 52);
    }

    #[test]
    fn unpack_roundtrips_flags() {
        for (b6, b7) in [(false, false), (true, false), (false, true), (true, true)] {
            let ctrl = Control::pack(Operation::Forward, b6, b7);
            assert_eq!(Control::unpack(ctrl.raw()).unwrap(), (Operation::Forward, b6, b7));
        }
    }

    #[test]
    fn unpack_rejects_undefined_opcode() {
        // 3 is a hole in the opcode numbering.
        assert_eq!(Control::unpack(0x03), Err(AlpError::InvalidOpcode(0x03)));
        // Flags must not leak into the opcode check.
        assert_eq!(Control::unpack(0xC3), Err(AlpError::InvalidOpcode(0x03)));
    }

    #[test]
    fn views_name_the_same_bits() {
        let ctrl = Control::pack(Operation::ResponseTag, true, true);
        let regular = ctrl.regular();
        assert!(regular.response_requested && regular.group);
        let tag = ctrl.tag_response();
        assert!(tag.error && tag.completed);
        let req = ctrl.tag_request();
        assert!(req.respond_when_completed);
    }
}
