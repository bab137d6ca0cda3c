//! The variable-width length operand.
//!
//! An unsigned magnitude is carried in the smallest of four wire widths. The
//! first byte's top 2 bits hold the number of extra bytes (0-3); the remaining
//! 6 bits plus the extra bytes hold the magnitude, big-endian:
//!
//! ```text
//! 1 byte:  00vvvvvv                                  v < 2^6
//! 2 bytes: 01vvvvvv vvvvvvvv                         v < 2^14
//! 3 bytes: 10vvvvvv vvvvvvvv vvvvvvvv                v < 2^22
//! 4 bytes: 11vvvvvv vvvvvvvv vvvvvvvv vvvvvvvv       v < 2^30
//! ```

use bytes::{Buf, BufMut, BytesMut};

use crate::cursor;
use crate::error::{AlpError, Result};

/// Largest value a 4-byte length operand can carry.
pub const MAX_LENGTH_OPERAND: u32 = (1 << 30) - 1;

/// Smallest wire width (1-4 bytes) covering `value`.
///
/// Monotonic non-decreasing in `value`; fails with [`AlpError::ValueTooLarge`]
/// beyond [`MAX_LENGTH_OPERAND`].
pub fn length_operand_coded_length(value: u32) -> Result<usize> {
    match value {
        0..=0x3F => Ok(1),
        0x40..=0x3FFF => Ok(2),
        0x4000..=0x3F_FFFF => Ok(3),
        0x40_0000..=MAX_LENGTH_OPERAND => Ok(4),
        _ => Err(AlpError::ValueTooLarge {
            value,
            max: MAX_LENGTH_OPERAND,
        }),
    }
}

/// Append `value` in its minimal width.
pub fn append_length_operand(dst: &mut BytesMut, value: u32) -> Result<()> {
    let width = length_operand_coded_length(value)?;
    let selector = ((width as u8) - 1) << 6;
    dst.put_u8(selector | (value >> (8 * (width - 1))) as u8);
    for shift in (0..width - 1).rev() {
        dst.put_u8((value >> (8 * shift)) as u8);
    }
    Ok(())
}

/// Read one length operand, reconstructing the exact magnitude.
pub fn parse_length_operand(src: &mut impl Buf) -> Result<u32> {
    let first = cursor::take_u8(src)?;
    let extra = (first >> 6) as usize;
    cursor::ensure(src, extra)?;
    let mut value = (first & 0x3F) as u32;
    for _ in 0..extra {
        value = (value << 8) | src.get_u8() as u32;
    }
    Ok(value)
}
