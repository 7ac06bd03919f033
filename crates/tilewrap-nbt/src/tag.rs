use tilewrap_common::TagKind;

/// A tag payload. Names live on [`NamedTag`], since list elements have none.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    /// Raw bytes, no text encoding is assumed.
    String(Vec<u8>),
    List(TagList),
    /// Entries in wire order. A decoded compound keeps its terminating End.
    Compound(Vec<NamedTag>),
    IntArray(Vec<i32>),
}

/// List payload. The element kind is stored explicitly so that empty lists
/// keep the kind they were declared with.
#[derive(Debug, Clone, PartialEq)]
pub struct TagList {
    pub element_kind: TagKind,
    pub items: Vec<Tag>,
}

/// A compound entry or a document root: a tag together with its name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTag {
    pub name: Vec<u8>,
    pub tag: Tag,
}

impl NamedTag {
    pub fn new(name: impl Into<Vec<u8>>, tag: Tag) -> Self {
        NamedTag {
            name: name.into(),
            tag,
        }
    }

    /// The terminator entry of a compound.
    pub fn end() -> Self {
        NamedTag {
            name: Vec::new(),
            tag: Tag::End,
        }
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::End => TagKind::End,
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::String(_) => TagKind::String,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
            Tag::IntArray(_) => TagKind::IntArray,
        }
    }

    pub fn get_type_id(&self) -> u8 {
        self.kind().id()
    }

    /// Builds a compound terminated by exactly one End entry.
    pub fn compound(entries: Vec<NamedTag>) -> Tag {
        let mut entries = entries;
        if !matches!(entries.last(), Some(NamedTag { tag: Tag::End, .. })) {
            entries.push(NamedTag::end());
        }
        Tag::Compound(entries)
    }

    pub fn list(element_kind: TagKind, items: Vec<Tag>) -> Tag {
        Tag::List(TagList {
            element_kind,
            items,
        })
    }

    pub fn string(value: impl Into<Vec<u8>>) -> Tag {
        Tag::String(value.into())
    }

    /// First entry with the given name. Duplicates after it are unreachable.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entry(name).map(|entry| &entry.tag)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Tag> {
        match self {
            Tag::Compound(entries) => entries
                .iter_mut()
                .find(|entry| !matches!(entry.tag, Tag::End) && entry.name == name.as_bytes())
                .map(|entry| &mut entry.tag),
            _ => None,
        }
    }

    pub fn entry(&self, name: &str) -> Option<&NamedTag> {
        self.as_compound()?
            .iter()
            .find(|entry| !matches!(entry.tag, Tag::End) && entry.name == name.as_bytes())
    }

    pub fn as_compound(&self) -> Option<&Vec<NamedTag>> {
        match self {
            Tag::Compound(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[u8]> {
        match self {
            Tag::ByteArray(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Tag::Short(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Tag::Byte(n) => Some(*n),
            _ => None,
        }
    }
}
