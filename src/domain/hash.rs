//! Content hashing for ants
//!
//! The content hash doubles as the display ordering of an ant and is persisted
//! in `ant_release.ant_content_hash`, so it must reproduce historical values
//! exactly:
//!
//! - Iterate the UTF-16 code units of the string
//! - `hash = (hash << 5) - hash + unit`, wrapping as a signed 32-bit integer
//! - Reinterpret the final bits as unsigned and reduce modulo `2^31 - 1`
//!
//! The result is always in `[0, 2^31 - 2]`.

/// Modulus applied to the final unsigned hash (`2^31 - 1`)
pub const HASH_MODULUS: u32 = i32::MAX as u32;

/// Computes the content hash of a string
pub fn content_hash(content: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in content.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    (hash as u32) % HASH_MODULUS
}
