//! Minimal Solidity ABI codec
//!
//! Covers the shapes the registry contract uses: `string` and `address`
//! arguments, and `string`, `address` and `string[]` return values.

use sha3::{Digest, Keccak256};

use crate::types::Address;

/// ABI word size in bytes.
const WORD: usize = 32;

/// A value passed as a call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    String(String),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        matches!(self, Self::String(_))
    }
}

/// ABI decoding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiError(pub String);

impl std::fmt::Display for AbiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ABI decode error: {}", self.0)
    }
}

impl std::error::Error for AbiError {}

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Selector followed by the encoded arguments.
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode(args));
    out
}

/// Head/tail encoding of a tuple of tokens.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend(uint_word((head_len + tail.len()) as u64));
        }
        match token {
            Token::Address(address) => {
                let mut word = [0u8; WORD];
                word[12..].copy_from_slice(&address.to_bytes());
                head.extend(word);
            }
            Token::String(s) => {
                tail.extend(uint_word(s.len() as u64));
                tail.extend(padded(s.as_bytes()));
            }
        }
    }

    head.extend(tail);
    head
}

/// Decode a single `string` return value.
pub fn decode_string(data: &[u8]) -> Result<String, AbiError> {
    let offset = read_usize(data, 0)?;
    read_string_at(data, offset)
}

/// Decode a single `address` return value.
pub fn decode_address(data: &[u8]) -> Result<Address, AbiError> {
    let word = read_word(data, 0)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(AbiError("address word has non-zero padding".to_string()));
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Address::from_bytes(bytes))
}

/// Decode a single `string[]` return value.
pub fn decode_string_array(data: &[u8]) -> Result<Vec<String>, AbiError> {
    let array_start = read_usize(data, 0)?;
    let len = read_usize(data, array_start)?;
    // element offsets are relative to the first word after the length
    let elements = add(array_start, WORD)?;

    (0..len)
        .map(|i| {
            let head = i
                .checked_mul(WORD)
                .ok_or_else(|| AbiError(format!("element {i} offset overflows")))?;
            let offset = read_usize(data, add(elements, head)?)?;
            read_string_at(data, add(elements, offset)?)
        })
        .collect()
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn padded(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let rem = out.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
    out
}

fn add(base: usize, delta: usize) -> Result<usize, AbiError> {
    base.checked_add(delta)
        .ok_or_else(|| AbiError(format!("offset {base} + {delta} overflows")))
}

fn read_word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    data.get(at..add(at, WORD)?)
        .ok_or_else(|| AbiError(format!("word at {at} out of bounds ({} bytes)", data.len())))
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let word = read_word(data, at)?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(AbiError(format!("integer at {at} too large")));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(bytes))
        .map_err(|_| AbiError(format!("integer at {at} too large")))
}

fn read_string_at(data: &[u8], at: usize) -> Result<String, AbiError> {
    let len = read_usize(data, at)?;
    let start = add(at, WORD)?;
    let bytes = data
        .get(start..add(start, len)?)
        .ok_or_else(|| AbiError(format!("string at {at} out of bounds")))?;
    String::from_utf8(bytes.to_vec()).map_err(|e| AbiError(e.to_string()))
}
