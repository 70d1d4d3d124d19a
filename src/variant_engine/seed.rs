//! Label-to-seed derivation: the reproducibility anchor of the whole tool.
//!
//! A group's label fully determines its generator stream, so the label alone
//! reproduces the rendered document bit-for-bit across runs and machines.

/// Derive the generator seed for a group label.
///
/// The label's raw bytes are read as a little-endian unsigned integer and
/// reduced mod 2^64 with wrapping arithmetic. Short labels ("A", "AB", …)
/// therefore map to small distinct integers; long labels wrap but stay
/// deterministic.
pub fn derive(label: &str) -> u64 {
    label
        .bytes()
        .rev()
        .fold(0u64, |acc, byte| acc.wrapping_mul(256).wrapping_add(u64::from(byte)))
}
