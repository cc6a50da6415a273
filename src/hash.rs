use {auto_impl::auto_impl, rapidhash::rapidhash};

/// Position on the ring.
///
/// The coordinate space wraps from `Point::MAX` back to zero. Bundled hash
/// functions may use only the lower bits (CRC32 and MD5 produce 32-bit
/// values), which is fine as long as a ring sticks to a single function.
pub type Point = u64;

/// Hash function used to place nodes and resources on the ring.
///
/// Must be deterministic: the same input always maps to the same point. No
/// cryptographic strength is required.
#[auto_impl(&, Box, Arc)]
pub trait HashFunction {
    fn hash(&self, data: &[u8]) -> Point;
}

/// CRC32 checksum, the default hash function.
#[derive(Debug, Default, Clone, Copy)]
pub struct Crc32Hasher;

impl HashFunction for Crc32Hasher {
    fn hash(&self, data: &[u8]) -> Point {
        crc32fast::hash(data) as Point
    }
}

/// MD5 digest truncated to its first four bytes (read big-endian).
///
/// Slower than CRC32, but spreads short, similar keys noticeably better.
#[derive(Debug, Default, Clone, Copy)]
pub struct Md5Hasher;

impl HashFunction for Md5Hasher {
    fn hash(&self, data: &[u8]) -> Point {
        let digest = md5::compute(data);
        let [a, b, c, d, ..] = digest.0;
        u32::from_be_bytes([a, b, c, d]) as Point
    }
}

/// Full-width 64-bit rapidhash.
#[derive(Debug, Default, Clone, Copy)]
pub struct RapidHasher;

impl HashFunction for RapidHasher {
    fn hash(&self, data: &[u8]) -> Point {
        rapidhash(data)
    }
}
