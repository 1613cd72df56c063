//! Sluice built-in filters.
//!
//! Families:
//! 1. String: case conversion, trimming, newline removal, prefix and suffix
//! 2. Markup: tag stripping
//! 3. Characters: digits, alpha, alnum, regex replacement
//! 4. Cast: int, float, null, boolean
//! 5. Word: camel case ↔ separators
//! 6. Date: year/month/day selects to ISO strings
//! 7. Compression: gzip/zlib/deflate adapters
//! 8. Lists: allow-list and deny-list matching

pub mod builtins;
pub mod cast;
pub mod chars;
pub mod compress;
pub mod date;
pub mod list;
pub mod markup;
pub mod string;
pub mod word;

mod util;

pub use builtins::{default_registry, register_builtins};
pub use compress::{CompressionAlgorithm, Compress, Decompress};
