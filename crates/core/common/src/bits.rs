//! Byte-level helpers
//!
//! Byte order reversal, byte extraction and packed-BCD conversion for
//! register and wire values.

/// Reverse the byte order of a 16-bit value
#[must_use]
#[inline]
pub const fn swap16(value: u16) -> u16 {
    value.swap_bytes()
}

/// Reverse the byte order of a 32-bit value
#[must_use]
#[inline]
pub const fn swap32(value: u32) -> u32 {
    value.swap_bytes()
}

/// Least significant byte
#[must_use]
#[inline]
pub const fn byte0(value: u32) -> u8 {
    value.to_le_bytes()[0]
}

/// Second byte (bits 8..16)
#[must_use]
#[inline]
pub const fn byte1(value: u32) -> u8 {
    value.to_le_bytes()[1]
}

/// Third byte (bits 16..24)
#[must_use]
#[inline]
pub const fn byte2(value: u32) -> u8 {
    value.to_le_bytes()[2]
}

/// Decode a packed-BCD byte (`0x42` -> `42`)
///
/// Returns `None` if either nibble is above 9.
#[must_use]
pub const fn bcd_to_bin(value: u8) -> Option<u8> {
    let high = value >> 4;
    let low = value & 0x0F;
    if high > 9 || low > 9 {
        return None;
    }
    Some(high * 10 + low)
}

/// Encode a value as packed BCD (`42` -> `0x42`)
///
/// Returns `None` for values above 99.
#[must_use]
pub const fn bin_to_bcd(value: u8) -> Option<u8> {
    if value > 99 {
        return None;
    }
    Some(((value / 10) << 4) | (value % 10))
}
