//! Bounds-checked reads over any [`Buf`].
//!
//! `bytes` panics on underflow; every read here checks `remaining()` first and
//! reports [`AlpError::TruncatedInput`] instead, so a decoder can be re-invoked
//! once more bytes arrive.

use bytes::Buf;

use crate::error::{AlpError, Result};

/// Fail with `TruncatedInput` unless `needed` bytes remain.
pub fn ensure(src: &impl Buf, needed: usize) -> Result<()> {
    if src.remaining() < needed {
        Err(AlpError::TruncatedInput)
    } else {
        Ok(())
    }
}

pub fn take_u8(src: &mut impl Buf) -> Result<u8> {
    ensure(src, 1)?;
    Ok(src.get_u8())
}

pub fn take_u16(src: &mut impl Buf) -> Result<u16> {
    ensure(src, 2)?;
    Ok(src.get_u16())
}

pub fn take_u32(src: &mut impl Buf) -> Result<u32> {
    ensure(src, 4)?;
    Ok(src.get_u32())
}

pub fn take_array<const N: usize>(src: &mut impl Buf) -> Result<[u8; N]> {
    ensure(src, N)?;
    let mut out = [0u8; N];
    src.copy_to_slice(&mut out);
    Ok(out)
}

pub fn take_vec(src: &mut impl Buf, len: usize) -> Result<Vec<u8>> {
    ensure(src, len)?;
    let mut out = vec![0u8; len];
    src.copy_to_slice(&mut out);
    Ok(out)
}
