//! Compression adapters and the `Compress` / `Decompress` filters.
//!
//! Binary payloads travel as standard base64 text so they fit in a `Value`.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::Compression;
use serde::Deserialize;
use serde_json::{json, Value};
use sluice_core::{parse_options, Filter, FilterError, Options, Result};
use std::io::{Read, Write};

const DEFAULT_LEVEL: u32 = 6;
const MAX_LEVEL: u32 = 9;

/// A compression codec.
pub trait CompressionAlgorithm: Send + Sync {
    fn name(&self) -> &'static str;

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// The adapter's effective settings.
    fn options(&self) -> Value;
}

/// Supported codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adapter {
    #[default]
    Gzip,
    Zlib,
    Deflate,
}

impl Adapter {
    pub fn build(self, level: u32) -> Result<Box<dyn CompressionAlgorithm>> {
        if level > MAX_LEVEL {
            return Err(FilterError::invalid_argument(format!(
                "compression level must be 0..={MAX_LEVEL}, got {level}"
            )));
        }
        Ok(Box::new(Flate { adapter: self, level }))
    }

    fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Zlib => "zlib",
            Self::Deflate => "deflate",
        }
    }
}

/// The three flate2 framings behind one adapter.
#[derive(Debug, Clone)]
struct Flate {
    adapter: Adapter,
    level: u32,
}

impl CompressionAlgorithm for Flate {
    fn name(&self) -> &'static str {
        self.adapter.name()
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let level = Compression::new(self.level);
        let out = match self.adapter {
            Adapter::Gzip => {
                let mut enc = GzEncoder::new(Vec::new(), level);
                enc.write_all(data).and_then(|_| enc.finish())
            }
            Adapter::Zlib => {
                let mut enc = ZlibEncoder::new(Vec::new(), level);
                enc.write_all(data).and_then(|_| enc.finish())
            }
            Adapter::Deflate => {
                let mut enc = DeflateEncoder::new(Vec::new(), level);
                enc.write_all(data).and_then(|_| enc.finish())
            }
        };
        out.with_context(|| format!("{} compression failed", self.name()))
            .map_err(FilterError::from)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let read = match self.adapter {
            Adapter::Gzip => GzDecoder::new(data).read_to_end(&mut out),
            Adapter::Zlib => ZlibDecoder::new(data).read_to_end(&mut out),
            Adapter::Deflate => DeflateDecoder::new(data).read_to_end(&mut out),
        };
        read.map_err(|e| {
            FilterError::invalid_argument(format!("{}: corrupt payload: {e}", self.name()))
        })?;
        Ok(out)
    }

    fn options(&self) -> Value {
        json!({ "adapter": self.name(), "level": self.level })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CompressOptions {
    adapter: Adapter,
    level: u32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self { adapter: Adapter::default(), level: DEFAULT_LEVEL }
    }
}

fn algorithm_from_options(filter: &str, options: &Options) -> Result<Box<dyn CompressionAlgorithm>> {
    let opts: CompressOptions = parse_options(filter, options)?;
    opts.adapter.build(opts.level)
}

/// Compress strings into base64 text.
pub struct Compress {
    algorithm: Box<dyn CompressionAlgorithm>,
}

impl Compress {
    pub fn new(algorithm: Box<dyn CompressionAlgorithm>) -> Self {
        Self { algorithm }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        algorithm_from_options("Compress", options).map(Self::new)
    }

    pub fn algorithm(&self) -> &dyn CompressionAlgorithm {
        self.algorithm.as_ref()
    }
}

impl Filter for Compress {
    fn filter(&self, value: Value) -> Result<Value> {
        match value {
            Value::String(s) => {
                let packed = self.algorithm.compress(s.as_bytes())?;
                Ok(Value::String(STANDARD.encode(packed)))
            }
            other => Ok(other),
        }
    }

    fn name(&self) -> &str {
        "Compress"
    }
}

/// Decode base64 text produced by [`Compress`] and inflate it back to a string.
pub struct Decompress {
    algorithm: Box<dyn CompressionAlgorithm>,
}

impl Decompress {
    pub fn new(algorithm: Box<dyn CompressionAlgorithm>) -> Self {
        Self { algorithm }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        algorithm_from_options("Decompress", options).map(Self::new)
    }

    pub fn algorithm(&self) -> &dyn CompressionAlgorithm {
        self.algorithm.as_ref()
    }
}

impl Filter for Decompress {
    fn filter(&self, value: Value) -> Result<Value> {
        match value {
            Value::String(s) => {
                let packed = STANDARD.decode(s.as_bytes()).map_err(|e| {
                    FilterError::invalid_argument(format!("Decompress: invalid base64: {e}"))
                })?;
                let raw = self.algorithm.decompress(&packed)?;
                let text = String::from_utf8(raw).map_err(|e| {
                    FilterError::invalid_argument(format!("Decompress: not UTF-8: {e}"))
                })?;
                Ok(Value::String(text))
            }
            other => Ok(other),
        }
    }

    fn name(&self) -> &str {
        "Decompress"
    }
}
