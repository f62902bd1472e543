//! ABA routing numbers and ACH trace numbers.

/// ABA checksum weights, applied cyclically over the nine digits.
const WEIGHTS: [u32; 9] = [3, 7, 1, 3, 7, 1, 3, 7, 1];

/// Validate an ABA routing transit number.
///
/// The input must be exactly nine ASCII digits and the weighted sum
/// `3·(d1+d4+d7) + 7·(d2+d5+d8) + (d3+d6+d9)` must be divisible by 10.
///
/// ```
/// use achfile::core::validate_routing_number;
///
/// assert!(validate_routing_number("021000021"));
/// assert!(!validate_routing_number("123456789"));
/// assert!(!validate_routing_number("02100002"));
/// ```
pub fn validate_routing_number(routing: &str) -> bool {
    let bytes = routing.as_bytes();
    if bytes.len() != 9 || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let sum: u32 = bytes
        .iter()
        .zip(WEIGHTS)
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();
    sum % 10 == 0
}

/// Compute the check digit (9th digit) for an 8-digit routing prefix.
///
/// Returns `None` if `prefix` is not exactly eight ASCII digits.
pub fn routing_check_digit(prefix: &str) -> Option<u8> {
    let bytes = prefix.as_bytes();
    if bytes.len() != 8 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let sum: u32 = bytes
        .iter()
        .zip(WEIGHTS)
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();
    // The 9th weight is 1, so the digit is whatever brings the sum to a multiple of 10.
    Some(((10 - sum % 10) % 10) as u8)
}

/// Build a 15-character trace number from an originating DFI and a sequence.
///
/// The first eight characters of `odfi` form the prefix (space-padded if
/// shorter); the sequence is zero-padded to seven digits and wraps at
/// ten million.
///
/// ```
/// use achfile::core::generate_trace_number;
///
/// assert_eq!(generate_trace_number("12345678", 1), "123456780000001");
/// ```
pub fn generate_trace_number(odfi: &str, sequence: u32) -> String {
    let prefix: String = odfi.chars().take(8).collect();
    format!("{:<8}{:07}", prefix, sequence % 10_000_000)
}
