//! Numeral parsing and rendering in radices 2 through 64.

use alloc::string::String;
use alloc::vec::Vec;

use crate::arith::{small, Leg, LEG_BITS, LEG_MASK};
use crate::error::{Error, ErrorCode, Result};
use crate::int::{Int, Sign};

pub(crate) const MIN_RADIX: u32 = 2;
pub(crate) const MAX_RADIX: u32 = 64;

// Digit alphabet shared by every radix. Letters decode case-insensitively
// through radix 36; above that the uppercase letters and the two trailing
// symbols become distinct digits.
const DIGITS: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+/";

/// Decode one character for the given radix.
#[inline]
fn decode_digit(c: u8, radix: u32) -> Option<u32> {
    let value = match c {
        b'0'..=b'9' => (c - b'0') as u32,
        b'a'..=b'z' => (c - b'a') as u32 + 10,
        b'A'..=b'Z' if radix <= 36 => (c - b'A') as u32 + 10,
        b'A'..=b'Z' => (c - b'A') as u32 + 36,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    if value < radix {
        Some(value)
    } else {
        None
    }
}

/// The largest power of the radix that fits a leg, as (power, digit count).
fn chunk(radix: u32) -> (Leg, usize) {
    let mut base = radix as Leg;
    let mut len = 1;
    while let Some(next) = base.checked_mul(radix as Leg) {
        if next > LEG_MASK {
            break;
        }
        base = next;
        len += 1;
    }
    (base, len)
}

/// Parse a signed numeral. See [`Int::from_str_radix`].
pub(crate) fn parse(text: &str, radix: u32) -> Result<Int> {
    if !(MIN_RADIX..=MAX_RADIX).contains(&radix) {
        return Err(Error::new(ErrorCode::InvalidArgument));
    }

    // Only `-` is a sign character: `+` is a digit in radices 63 and 64.
    let bytes = text.as_bytes();
    let (sign, start) = match bytes.first() {
        Some(b'-') => (Sign::Negative, 1),
        _ => (Sign::Positive, 0),
    };
    let digits = &bytes[start..];
    if digits.is_empty() {
        return Err(Error::parse(ErrorCode::InvalidArgument, start));
    }

    // Fold whole chunks of digits into a single leg, then push each chunk
    // into the accumulator with one scalar multiply-add.
    let (chunk_base, chunk_len) = chunk(radix);
    let mut legs: Vec<Leg> = Vec::new();
    let mut i = 0;
    while i < digits.len() {
        let end = usize::min(i + chunk_len, digits.len());
        let mut value: Leg = 0;
        for (j, &c) in digits[i..end].iter().enumerate() {
            match decode_digit(c, radix) {
                Some(d) => value = value * radix as Leg + d as Leg,
                None => return Err(Error::parse(ErrorCode::InvalidArgument, start + i + j)),
            }
        }
        let scale = if end - i == chunk_len {
            chunk_base
        } else {
            (radix as Leg).pow((end - i) as u32)
        };
        small::imul(&mut legs, scale);
        if value != 0 {
            small::iadd(&mut legs, value);
        }
        i = end;
    }

    Ok(Int::from_parts(sign, legs))
}

/// Render a signed numeral. The radix must already be validated.
pub(crate) fn render(x: &Int, radix: u32) -> String {
    debug_assert!((MIN_RADIX..=MAX_RADIX).contains(&radix));

    if x.is_zero() {
        return String::from("0");
    }
    let mut out = String::new();
    if x.is_negative() {
        out.push('-');
    }
    if radix.is_power_of_two() {
        render_pow2(&x.legs, radix, &mut out);
    } else {
        render_general(&x.legs, radix, &mut out);
    }
    out
}

/// Power-of-two radices read their digits straight out of the bits.
fn render_pow2(legs: &[Leg], radix: u32, out: &mut String) {
    let bits = radix.trailing_zeros() as usize;
    let total = small::bit_length(legs);
    let count = (total + bits - 1) / bits;
    for k in (0..count).rev() {
        let d = extract_bits(legs, k * bits, bits);
        out.push(DIGITS[d as usize] as char);
    }
}

/// Extract `width` bits starting at bit `pos`, straddling leg boundaries.
#[inline]
fn extract_bits(legs: &[Leg], pos: usize, width: usize) -> u32 {
    let leg = pos / LEG_BITS;
    let bit = pos % LEG_BITS;
    let mut v = legs[leg] >> bit;
    if bit + width > LEG_BITS && leg + 1 < legs.len() {
        v |= legs[leg + 1] << (LEG_BITS - bit);
    }
    (v & (((1 as Leg) << width) - 1)) as u32
}

/// Other radices peel off one leg-sized chunk of digits per short division.
fn render_general(legs: &[Leg], radix: u32, out: &mut String) {
    let (chunk_base, chunk_len) = chunk(radix);
    let mut mag = legs.to_vec();
    let mut chunks: Vec<Leg> = Vec::new();
    while !mag.is_empty() {
        chunks.push(small::idiv_rem(&mut mag, chunk_base));
    }

    // The most significant chunk prints bare; the rest pad to the full
    // chunk width.
    let mut buffer = itoa::Buffer::new();
    for (i, &c) in chunks.iter().rev().enumerate() {
        let min_width = if i == 0 { 0 } else { chunk_len };
        if radix == 10 {
            let t = buffer.format(c);
            for _ in t.len()..min_width {
                out.push('0');
            }
            out.push_str(t);
        } else {
            push_chunk(c, radix, min_width, out);
        }
    }
}

fn push_chunk(value: Leg, radix: u32, min_width: usize, out: &mut String) {
    let mut buf = [0u8; 64];
    let mut pos = buf.len();
    let mut v = value;
    while v != 0 {
        pos -= 1;
        buf[pos] = DIGITS[(v % radix as Leg) as usize];
        v /= radix as Leg;
    }
    while buf.len() - pos < min_width {
        pos -= 1;
        buf[pos] = b'0';
    }
    for &b in &buf[pos..] {
        out.push(b as char);
    }
}
