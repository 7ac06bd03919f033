use std::fmt;

pub type Result<T> = std::result::Result<T, crate::error::TilewrapError>;

/// Wire identifier of a tag. The discriminants are the kind bytes used on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
}

impl TagKind {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Maps a kind byte back to its kind, `None` for anything outside 0-11.
    pub fn from_id(id: u8) -> Option<TagKind> {
        let kind = match id {
            0 => TagKind::End,
            1 => TagKind::Byte,
            2 => TagKind::Short,
            3 => TagKind::Int,
            4 => TagKind::Long,
            5 => TagKind::Float,
            6 => TagKind::Double,
            7 => TagKind::ByteArray,
            8 => TagKind::String,
            9 => TagKind::List,
            10 => TagKind::Compound,
            11 => TagKind::IntArray,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            TagKind::End => "End",
            TagKind::Byte => "Byte",
            TagKind::Short => "Short",
            TagKind::Int => "Int",
            TagKind::Long => "Long",
            TagKind::Float => "Float",
            TagKind::Double => "Double",
            TagKind::ByteArray => "ByteArray",
            TagKind::String => "String",
            TagKind::List => "List",
            TagKind::Compound => "Compound",
            TagKind::IntArray => "IntArray",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ids_are_stable() {
        for id in 0..=11u8 {
            let kind = TagKind::from_id(id).unwrap();
            assert_eq!(kind.id(), id);
        }
        assert_eq!(TagKind::from_id(12), None);
        assert_eq!(TagKind::from_id(255), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(format!("{}", TagKind::Compound), "Compound(10)");
        assert_eq!(format!("{}", TagKind::End), "End(0)");
    }
}
