//! Binary encoder and decoder for tag trees.
//!
//! Layout of a full tag: kind byte, then (unless End) a big-endian `u16` name
//! length and the raw name bytes, then the kind-specific payload. List
//! elements are written payload-only after a shared element kind byte.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};
use tilewrap_common::{MalformedReason, Result, TagKind, TilewrapError};

use crate::tag::{NamedTag, Tag, TagList};

/// Nesting limit for lists and compounds while decoding.
pub const MAX_DEPTH: usize = 512;

/// Decodes exactly one root tag. Any bytes after it are an error.
pub fn decode(bytes: &[u8]) -> Result<NamedTag> {
    let (tag, consumed) = decode_at(bytes, 0)?;
    if consumed != bytes.len() {
        return Err(TilewrapError::malformed(
            consumed,
            MalformedReason::TrailingBytes(bytes.len() - consumed),
        ));
    }
    Ok(tag)
}

/// Decodes one full tag starting at `offset` and returns it together with the
/// number of bytes it occupied, so sibling tags can be read back to back.
pub fn decode_at(bytes: &[u8], offset: usize) -> Result<(NamedTag, usize)> {
    let mut decoder = Decoder::new(bytes, offset)?;
    let tag = decoder.read_named(0)?;
    Ok((tag, decoder.offset() - offset))
}

pub fn encode(tag: &NamedTag) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    tag.write(&mut buffer)?;
    Ok(buffer)
}

struct Decoder<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8], offset: usize) -> Result<Self> {
        if offset > bytes.len() {
            return Err(TilewrapError::malformed(
                offset,
                MalformedReason::Truncated {
                    needed: 1,
                    available: 0,
                },
            ));
        }
        let mut cursor = Cursor::new(bytes);
        cursor.set_position(offset as u64);
        Ok(Decoder { cursor })
    }

    fn offset(&self) -> usize {
        self.cursor.position() as usize
    }

    fn remaining(&self) -> usize {
        self.cursor.get_ref().len() - self.offset()
    }

    fn malformed(&self, reason: MalformedReason) -> TilewrapError {
        TilewrapError::malformed(self.offset(), reason)
    }

    fn require(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(self.malformed(MalformedReason::Truncated { needed, available }));
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        Ok(self.cursor.read_u8()?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.require(2)?;
        Ok(self.cursor.read_u16::<BigEndian>()?)
    }

    fn read_i32(&mut self) -> Result<i32> {
        self.require(4)?;
        Ok(self.cursor.read_i32::<BigEndian>()?)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.require(len)?;
        let mut bytes = vec![0u8; len];
        self.cursor.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads an `i32` length prefix and checks that `len * elem_size` bytes
    /// are still available.
    fn read_length(&mut self, elem_size: usize) -> Result<usize> {
        let length = self.read_i32()?;
        if length < 0 {
            return Err(TilewrapError::malformed(
                self.offset() - 4,
                MalformedReason::NegativeLength(length),
            ));
        }
        let length = length as usize;
        self.require(length.saturating_mul(elem_size))?;
        Ok(length)
    }

    fn read_kind(&mut self) -> Result<TagKind> {
        let id = self.read_u8()?;
        TagKind::from_id(id).ok_or_else(|| {
            TilewrapError::malformed(self.offset() - 1, MalformedReason::UnknownKind(id))
        })
    }

    fn read_named(&mut self, depth: usize) -> Result<NamedTag> {
        let kind = self.read_kind()?;
        if kind == TagKind::End {
            return Ok(NamedTag::end());
        }

        let name_length = self.read_u16()? as usize;
        let name = self.read_bytes(name_length)?;
        let tag = self.read_payload(kind, depth)?;
        Ok(NamedTag { name, tag })
    }

    fn read_payload(&mut self, kind: TagKind, depth: usize) -> Result<Tag> {
        let tag = match kind {
            TagKind::End => Tag::End,
            TagKind::Byte => {
                self.require(1)?;
                Tag::Byte(self.cursor.read_i8()?)
            }
            TagKind::Short => {
                self.require(2)?;
                Tag::Short(self.cursor.read_i16::<BigEndian>()?)
            }
            TagKind::Int => Tag::Int(self.read_i32()?),
            TagKind::Long => {
                self.require(8)?;
                Tag::Long(self.cursor.read_i64::<BigEndian>()?)
            }
            TagKind::Float => {
                self.require(4)?;
                Tag::Float(self.cursor.read_f32::<BigEndian>()?)
            }
            TagKind::Double => {
                self.require(8)?;
                Tag::Double(self.cursor.read_f64::<BigEndian>()?)
            }
            TagKind::ByteArray => {
                let length = self.read_length(1)?;
                Tag::ByteArray(self.read_bytes(length)?)
            }
            TagKind::String => {
                let length = self.read_u16()? as usize;
                Tag::String(self.read_bytes(length)?)
            }
            TagKind::List => self.read_list(depth)?,
            TagKind::Compound => self.read_compound(depth)?,
            TagKind::IntArray => {
                let length = self.read_length(4)?;
                let mut ints = Vec::with_capacity(length);
                for _ in 0..length {
                    ints.push(self.cursor.read_i32::<BigEndian>()?);
                }
                Tag::IntArray(ints)
            }
        };
        Ok(tag)
    }

    fn enter(&self, depth: usize) -> Result<usize> {
        if depth >= MAX_DEPTH {
            return Err(self.malformed(MalformedReason::TooDeep(MAX_DEPTH)));
        }
        Ok(depth + 1)
    }

    fn read_list(&mut self, depth: usize) -> Result<Tag> {
        let depth = self.enter(depth)?;
        let id = self.read_u8()?;
        let element_kind = TagKind::from_id(id).ok_or_else(|| {
            TilewrapError::malformed(self.offset() - 1, MalformedReason::InvalidListKind(id))
        })?;
        let length = self.read_length(min_payload_size(element_kind))?;
        if element_kind == TagKind::End && length > 0 {
            return Err(self.malformed(MalformedReason::EndListNotEmpty(length)));
        }

        let mut items = Vec::with_capacity(length);
        for _ in 0..length {
            items.push(self.read_payload(element_kind, depth)?);
        }
        Ok(Tag::List(TagList {
            element_kind,
            items,
        }))
    }

    fn read_compound(&mut self, depth: usize) -> Result<Tag> {
        let depth = self.enter(depth)?;
        let mut entries = Vec::new();
        loop {
            let entry = self.read_named(depth)?;
            let is_end = matches!(entry.tag, Tag::End);
            entries.push(entry);
            if is_end {
                break;
            }
        }
        Ok(Tag::Compound(entries))
    }
}

/// Smallest number of bytes a payload of this kind can occupy.
fn min_payload_size(kind: TagKind) -> usize {
    match kind {
        TagKind::End => 0,
        TagKind::Byte => 1,
        TagKind::Short | TagKind::String => 2,
        TagKind::Int | TagKind::Float | TagKind::ByteArray | TagKind::IntArray => 4,
        TagKind::Long | TagKind::Double => 8,
        TagKind::List => 5,
        TagKind::Compound => 1,
    }
}

fn u16_length(what: &'static str, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| TilewrapError::LengthOverflow { what, len })
}

fn i32_length(what: &'static str, len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| TilewrapError::LengthOverflow { what, len })
}

impl NamedTag {
    /// Reads a complete document from `reader`, rejecting trailing bytes.
    pub fn read<R: Read>(reader: &mut R) -> Result<NamedTag> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        decode(&bytes)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.tag.write(writer, &self.name)
    }
}

impl Tag {
    /// Writes kind, name and payload. End is written as its kind byte alone.
    pub fn write<W: Write>(&self, writer: &mut W, name: &[u8]) -> Result<()> {
        writer.write_u8(self.get_type_id())?;

        if matches!(self, Tag::End) {
            return Ok(());
        }

        writer.write_u16::<BigEndian>(u16_length("name", name.len())?)?;
        writer.write_all(name)?;
        self.write_payload(writer)
    }

    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Tag::End => {}
            Tag::Byte(v) => writer.write_i8(*v)?,
            Tag::Short(v) => writer.write_i16::<BigEndian>(*v)?,
            Tag::Int(v) => writer.write_i32::<BigEndian>(*v)?,
            Tag::Long(v) => writer.write_i64::<BigEndian>(*v)?,
            Tag::Float(v) => writer.write_f32::<BigEndian>(*v)?,
            Tag::Double(v) => writer.write_f64::<BigEndian>(*v)?,
            Tag::ByteArray(v) => {
                writer.write_i32::<BigEndian>(i32_length("byte array", v.len())?)?;
                writer.write_all(v)?;
            }
            Tag::String(v) => {
                writer.write_u16::<BigEndian>(u16_length("string", v.len())?)?;
                writer.write_all(v)?;
            }
            Tag::List(list) => {
                for item in &list.items {
                    let found = item.kind();
                    if found == TagKind::End {
                        return Err(TilewrapError::MisplacedEnd);
                    }
                    if found != list.element_kind {
                        return Err(TilewrapError::HeterogeneousList {
                            expected: list.element_kind,
                            found,
                        });
                    }
                }
                writer.write_u8(list.element_kind.id())?;
                writer.write_i32::<BigEndian>(i32_length("list", list.items.len())?)?;
                for item in &list.items {
                    item.write_payload(writer)?;
                }
            }
            Tag::Compound(entries) => {
                let last = entries.len().saturating_sub(1);
                for (index, entry) in entries.iter().enumerate() {
                    if matches!(entry.tag, Tag::End) && index != last {
                        return Err(TilewrapError::MisplacedEnd);
                    }
                    entry.write(writer)?;
                }
                if !matches!(entries.last(), Some(NamedTag { tag: Tag::End, .. })) {
                    Tag::End.write(writer, &[])?;
                }
            }
            Tag::IntArray(v) => {
                writer.write_i32::<BigEndian>(i32_length("int array", v.len())?)?;
                for &i in v {
                    writer.write_i32::<BigEndian>(i)?;
                }
            }
        }
        Ok(())
    }
}
