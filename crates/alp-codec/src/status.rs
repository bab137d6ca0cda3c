//! Wire-visible status codes.
//!
//! These are the small integers a node reports to a peer inside a status
//! action. They are a lossy subset of the crate's internal [`AlpError`]
//! taxonomy.

use crate::error::{AlpError, Result};

/// Status codes carried by an action-status action.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlpStatus {
    Ok = 0x00,
    PartiallyCompleted = 0x01,
    UnknownError = 0x80,
    IncompleteOperand = 0xF5,
    UnknownOperation = 0xF6,
    InsufficientPermissions = 0xFC,
    FileIdAlreadyExists = 0xFE,
    FileIdNotExists = 0xFF,
}

impl TryFrom<u8> for AlpStatus {
    type Error = AlpError;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0x00 => AlpStatus::Ok,
            0x01 => AlpStatus::PartiallyCompleted,
            0x80 => AlpStatus::UnknownError,
            0xF5 => AlpStatus::IncompleteOperand,
            0xF6 => AlpStatus::UnknownOperation,
            0xFC => AlpStatus::InsufficientPermissions,
            0xFE => AlpStatus::FileIdAlreadyExists,
            0xFF => AlpStatus::FileIdNotExists,
            other => return Err(AlpError::InvalidStatusCode(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_codes() {
        for status in [
            AlpStatus::Ok,
            AlpStatus::PartiallyCompleted,
            AlpStatus::UnknownError,
            AlpStatus::IncompleteOperand,
            AlpStatus::UnknownOperation,
            AlpStatus::InsufficientPermissions,
            AlpStatus::FileIdAlreadyExists,
            AlpStatus::FileIdNotExists,
        ] {
            assert_eq!(AlpStatus::try_from(status as u8).unwrap(), status);
        }
    }

    #[test]
    fn undefined_code_is_rejected() {
        assert_eq!(
            AlpStatus::try_from(0x42),
            Err(AlpError::InvalidStatusCode(0x42))
        );
    }
}
