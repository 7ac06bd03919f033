use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tilewrap_common::{MalformedReason, Result, TilewrapError};

use crate::codec::{decode, encode};
use crate::tag::{NamedTag, Tag};

// NbtFile represents a complete tag document with compression support
#[derive(Debug, Clone, PartialEq)]
pub struct NbtFile {
    pub root: NamedTag,
}

impl NbtFile {
    /// Wraps a root tag. Documents always start with a compound.
    pub fn new(root: NamedTag) -> Result<Self> {
        if !matches!(root.tag, Tag::Compound(_)) {
            return Err(TilewrapError::malformed(0, MalformedReason::NotCompound));
        }
        Ok(NbtFile { root })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(decode(bytes)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(&self.root)
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Self::new(NamedTag::read(reader)?)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.root.write(writer)
    }

    pub fn read_gzip<R: Read>(reader: &mut R) -> Result<Self> {
        let mut decoder = GzDecoder::new(reader);
        Self::read(&mut decoder)
    }

    pub fn write_gzip<W: Write>(&self, writer: &mut W) -> Result<()> {
        // Encode first so a bad tree never leaves a half-written stream behind.
        let bytes = self.to_bytes()?;
        let mut encoder = GzEncoder::new(writer, Compression::default());
        encoder.write_all(&bytes)?;
        encoder.finish()?;
        Ok(())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_gzip(&mut reader)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_encoded(path, &self.to_bytes()?)
    }
}

/// Gzips an already encoded document into `path`.
pub fn save_encoded<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = GzEncoder::new(writer, Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()?.flush()?;
    Ok(())
}
