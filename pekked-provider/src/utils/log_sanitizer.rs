//! Log sanitization utilities
//!
//! Keeps RPC payloads (ABI blobs, contract bytecode) from flooding debug logs.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for logging, noting the original length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Summarize call data as `selector (+N bytes)`.
pub fn summarize_calldata(data: &[u8]) -> String {
    if data.len() <= 4 {
        format!("0x{}", hex::encode(data))
    } else {
        format!("0x{} (+{} bytes)", hex::encode(&data[..4]), data.len() - 4)
    }
}
