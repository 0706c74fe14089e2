//! 24-bit integer codec.
//!
//! Three bytes is not a native width, so these are implemented directly
//! instead of going through [`byteorder`]. Big-endian lays the most
//! significant of the three bytes first, little-endian the least
//! significant. Signed values are two's-complement with the sign in bit 23,
//! sign-extended on decode.

/// Largest value an unsigned 24-bit integer can hold.
pub const U24_MAX: u32 = 0x00FF_FFFF;

/// Smallest value a signed 24-bit integer can hold.
pub const I24_MIN: i32 = -0x0080_0000;

/// Largest value a signed 24-bit integer can hold.
pub const I24_MAX: i32 = 0x007F_FFFF;

/// Encodes the low 24 bits of `value` in big-endian order.
pub fn encode_u24_be(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Encodes the low 24 bits of `value` in little-endian order.
pub fn encode_u24_le(value: u32) -> [u8; 3] {
    [value as u8, (value >> 8) as u8, (value >> 16) as u8]
}

pub fn encode_i24_be(value: i32) -> [u8; 3] {
    encode_u24_be(value as u32 & U24_MAX)
}

pub fn encode_i24_le(value: i32) -> [u8; 3] {
    encode_u24_le(value as u32 & U24_MAX)
}

pub fn decode_u24_be(bytes: [u8; 3]) -> u32 {
    (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])
}

pub fn decode_u24_le(bytes: [u8; 3]) -> u32 {
    (u32::from(bytes[2]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[0])
}

pub fn decode_i24_be(bytes: [u8; 3]) -> i32 {
    sign_extend(decode_u24_be(bytes))
}

pub fn decode_i24_le(bytes: [u8; 3]) -> i32 {
    sign_extend(decode_u24_le(bytes))
}

fn sign_extend(value: u32) -> i32 {
    if value & 0x0080_0000 != 0 {
        (value | 0xFF00_0000) as i32
    } else {
        value as i32
    }
}
