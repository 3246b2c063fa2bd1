//! RFC 4648 Base32 (standard alphabet, `=` padding)
//!
//! Every 5 input bytes become 8 output characters, most significant bit
//! first. Decoding accepts padded and unpadded input and is strict about the
//! alphabet: only `A`-`Z` and `2`-`7` are valid.

use thiserror::Error;

/// Padding character
pub const PAD: u8 = b'=';

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup, 0xFF marks characters outside the alphabet
const INVALID: u8 = 0xFF;
const DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Characters emitted for a tail of 0..=5 bytes
const CHARS_FOR_BYTES: [usize; 6] = [0, 2, 4, 5, 7, 8];

/// Bytes recovered from a tail of 0..=8 characters (0 for invalid lengths)
const BYTES_FOR_CHARS: [usize; 9] = [0, 0, 1, 0, 2, 3, 0, 4, 5];

/// Decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid base32 length: {0} characters without padding")]
    InvalidLength(usize),

    #[error("invalid base32 character {ch:?} at position {index}")]
    InvalidCharacter { ch: char, index: usize },

    #[error("decoded data is not valid UTF-8")]
    InvalidUtf8,
}

/// Number of characters `encode` produces for `len` input bytes
pub fn encoded_len(len: usize) -> usize {
    len.div_ceil(5) * 8
}

/// Number of bytes `decode` produces for `text`, ignoring validity
pub fn decoded_len(text: &str) -> usize {
    let unpadded = strip_padding(text.as_bytes()).len();
    unpadded / 8 * 5 + BYTES_FOR_CHARS[unpadded % 8]
}

/// Encode bytes as padded Base32
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(encoded_len(data.len()));

    for chunk in data.chunks(5) {
        // Pack up to 40 bits, missing bytes read as zero
        let mut bits: u64 = 0;
        for i in 0..5 {
            bits = (bits << 8) | chunk.get(i).copied().unwrap_or(0) as u64;
        }

        let emit = CHARS_FOR_BYTES[chunk.len()];
        for i in 0..8 {
            if i < emit {
                let index = (bits >> (35 - 5 * i)) & 0x1F;
                out.push(ALPHABET[index as usize] as char);
            } else {
                out.push(PAD as char);
            }
        }
    }

    out
}

/// Encode the UTF-8 bytes of a string
pub fn encode_str(text: &str) -> String {
    encode(text.as_bytes())
}

/// Decode padded or unpadded Base32.
///
/// Fails on any character outside the alphabet and on unpadded lengths of
/// 1, 3 or 6 modulo 8, which no encoder can produce.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let input = strip_padding(text.as_bytes());

    if matches!(input.len() % 8, 1 | 3 | 6) {
        return Err(DecodeError::InvalidLength(input.len()));
    }

    let mut out = Vec::with_capacity(decoded_len(text));

    for (group, chunk) in input.chunks(8).enumerate() {
        let mut bits: u64 = 0;
        for (i, &c) in chunk.iter().enumerate() {
            let value = DECODE_TABLE[c as usize];
            if value == INVALID {
                return Err(invalid_character(text, group * 8 + i));
            }
            bits = (bits << 5) | value as u64;
        }

        // Left-align a short final group as if it were zero padded
        bits <<= 5 * (8 - chunk.len());

        for i in 0..BYTES_FOR_CHARS[chunk.len()] {
            out.push((bits >> (32 - 8 * i)) as u8);
        }
    }

    Ok(out)
}

/// Decode Base32 into a UTF-8 string
pub fn decode_to_string(text: &str) -> Result<String, DecodeError> {
    let bytes = decode(text)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
}

fn strip_padding(input: &[u8]) -> &[u8] {
    let end = input
        .iter()
        .rposition(|&c| c != PAD)
        .map_or(0, |pos| pos + 1);
    &input[..end]
}

/// Build the error for the byte at `index`, reporting the whole character
fn invalid_character(text: &str, index: usize) -> DecodeError {
    // Non-ASCII input may land mid-character; walk back to its start
    let mut start = index;
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let ch = text[start..].chars().next().unwrap_or('\u{FFFD}');
    DecodeError::InvalidCharacter { ch, index: start }
}
