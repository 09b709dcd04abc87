//! Delete-set chunk planning.
//!
//! The registry's bulk-delete call accepts at most 100 image digests per
//! request, so an unbounded delete set is split into consecutive
//! fixed-size chunks before submission. Chunk boundaries are purely a size
//! constraint; submission order follows the delete set's discovery order.

/// Upper bound on digests per bulk-delete request, imposed by the registry
/// transport.
pub const MAX_IMAGES_PER_DELETE: usize = 100;

/// Splits a delete set into consecutive chunks of at most
/// [`MAX_IMAGES_PER_DELETE`] digests, preserving order.
///
/// Each chunk is submitted as one independent request; a failure in one
/// chunk does not block the next. An empty delete set yields no chunks.
///
/// # Examples
///
/// ```rust
/// use lethe_core::batch::chunked;
///
/// let digests: Vec<String> = (0..250).map(|i| format!("sha256:{i:04}")).collect();
/// let sizes: Vec<usize> = chunked(&digests).map(<[String]>::len).collect();
/// assert_eq!(sizes, [100, 100, 50]);
/// ```
pub fn chunked(digests: &[String]) -> impl Iterator<Item = &[String]> {
    digests.chunks(MAX_IMAGES_PER_DELETE)
}
