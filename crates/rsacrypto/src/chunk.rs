//! Fixed-size block splitting
//!
//! RSA can only process one modulus-sized block at a time, so payloads are
//! cut into `limit`-byte chunks (the last one may be shorter) and each chunk
//! goes through its own primitive call. Chunk order is the only framing:
//! there are no length prefixes or separators.

/// Split `buffer` into consecutive `limit`-byte chunks.
///
/// The final chunk holds the remainder if `buffer.len()` is not a multiple of
/// `limit`. Empty input yields no chunks at all. `limit` must be non-zero.
pub fn split(buffer: &[u8], limit: usize) -> Vec<&[u8]> {
    debug_assert!(limit > 0, "chunk limit must be positive");
    buffer.chunks(limit).collect()
}

/// Number of chunks `split` produces for `len` bytes.
pub fn chunk_count(len: usize, limit: usize) -> usize {
    len.div_ceil(limit)
}
