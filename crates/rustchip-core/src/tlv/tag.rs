use core::fmt;

use crate::tlv::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

pub const TAG_CONTROL_SHIFT: u8 = 5;
pub const TAG_CONTROL_MASK: u8 = 0xE0;
pub const ELEMENT_TYPE_MASK: u8 = 0x1F;

/// Control byte of an end-of-container marker (anonymous tag, type 0x18).
pub const END_OF_CONTAINER: u8 = ElementType::EndOfContainer as u8;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ElementType {
    Int8 = 0x00,
    Int16 = 0x01,
    Int32 = 0x02,
    Int64 = 0x03,
    UInt8 = 0x04,
    UInt16 = 0x05,
    UInt32 = 0x06,
    UInt64 = 0x07,
    BooleanFalse = 0x08,
    BooleanTrue = 0x09,
    Float32 = 0x0A,
    Float64 = 0x0B,
    Utf8String1 = 0x0C,
    Utf8String2 = 0x0D,
    Utf8String4 = 0x0E,
    Utf8String8 = 0x0F,
    ByteString1 = 0x10,
    ByteString2 = 0x11,
    ByteString4 = 0x12,
    ByteString8 = 0x13,
    Null = 0x14,
    Structure = 0x15,
    Array = 0x16,
    List = 0x17,
    EndOfContainer = 0x18,
}

impl ElementType {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        Ok(match value {
            0x00 => Self::Int8,
            0x01 => Self::Int16,
            0x02 => Self::Int32,
            0x03 => Self::Int64,
            0x04 => Self::UInt8,
            0x05 => Self::UInt16,
            0x06 => Self::UInt32,
            0x07 => Self::UInt64,
            0x08 => Self::BooleanFalse,
            0x09 => Self::BooleanTrue,
            0x0A => Self::Float32,
            0x0B => Self::Float64,
            0x0C => Self::Utf8String1,
            0x0D => Self::Utf8String2,
            0x0E => Self::Utf8String4,
            0x0F => Self::Utf8String8,
            0x10 => Self::ByteString1,
            0x11 => Self::ByteString2,
            0x12 => Self::ByteString4,
            0x13 => Self::ByteString8,
            0x14 => Self::Null,
            0x15 => Self::Structure,
            0x16 => Self::Array,
            0x17 => Self::List,
            0x18 => Self::EndOfContainer,
            _ => return Err(DecodeError::InvalidElementType),
        })
    }

    pub const fn is_container(self) -> bool {
        matches!(self, Self::Structure | Self::Array | Self::List)
    }

    pub const fn container_type(self) -> Option<ContainerType> {
        match self {
            Self::Structure => Some(ContainerType::Structure),
            Self::Array => Some(ContainerType::Array),
            Self::List => Some(ContainerType::List),
            _ => None,
        }
    }

    pub const fn is_signed_integer(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    pub const fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64
        )
    }

    pub const fn is_utf8_string(self) -> bool {
        matches!(
            self,
            Self::Utf8String1 | Self::Utf8String2 | Self::Utf8String4 | Self::Utf8String8
        )
    }

    pub const fn is_byte_string(self) -> bool {
        matches!(
            self,
            Self::ByteString1 | Self::ByteString2 | Self::ByteString4 | Self::ByteString8
        )
    }

    /// Width of the value for fixed-size types, `None` for strings.
    pub const fn fixed_value_len(self) -> Option<usize> {
        match self {
            Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::Utf8String1
            | Self::Utf8String2
            | Self::Utf8String4
            | Self::Utf8String8
            | Self::ByteString1
            | Self::ByteString2
            | Self::ByteString4
            | Self::ByteString8 => None,
            _ => Some(0),
        }
    }

    /// Width of the length field preceding a string value.
    pub const fn length_field_len(self) -> Option<usize> {
        match self {
            Self::Utf8String1 | Self::ByteString1 => Some(1),
            Self::Utf8String2 | Self::ByteString2 => Some(2),
            Self::Utf8String4 | Self::ByteString4 => Some(4),
            Self::Utf8String8 | Self::ByteString8 => Some(8),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => "int",
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => "uint",
            Self::BooleanFalse | Self::BooleanTrue => "bool",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::Utf8String1 | Self::Utf8String2 | Self::Utf8String4 | Self::Utf8String8 => "utf8",
            Self::ByteString1 | Self::ByteString2 | Self::ByteString4 | Self::ByteString8 => {
                "bytes"
            }
            Self::Null => "null",
            Self::Structure => "struct",
            Self::Array => "array",
            Self::List => "list",
            Self::EndOfContainer => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContainerType {
    Structure,
    Array,
    List,
}

impl ContainerType {
    pub const fn element_type(self) -> ElementType {
        match self {
            Self::Structure => ElementType::Structure,
            Self::Array => ElementType::Array,
            Self::List => ElementType::List,
        }
    }
}

/// Element tag as carried on the wire.
///
/// Common and implicit profile tags use the 2-byte form when the tag number
/// fits in 16 bits, fully-qualified tags the 6-byte form likewise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tag {
    Anonymous,
    Context(u8),
    CommonProfile(u32),
    ImplicitProfile(u32),
    FullyQualified {
        vendor_id: u16,
        profile_num: u16,
        tag_num: u32,
    },
}

impl Tag {
    /// Tag control value (high 3 bits of the control byte, unshifted).
    pub const fn control(self) -> u8 {
        match self {
            Tag::Anonymous => 0,
            Tag::Context(_) => 1,
            Tag::CommonProfile(n) => {
                if n <= 0xFFFF {
                    2
                } else {
                    3
                }
            }
            Tag::ImplicitProfile(n) => {
                if n <= 0xFFFF {
                    4
                } else {
                    5
                }
            }
            Tag::FullyQualified { tag_num, .. } => {
                if tag_num <= 0xFFFF {
                    6
                } else {
                    7
                }
            }
        }
    }

    /// Number of tag bytes following the control byte.
    pub const fn encoded_len(self) -> usize {
        match self.control() {
            0 => 0,
            1 => 1,
            2 | 4 => 2,
            3 | 5 => 4,
            6 => 6,
            _ => 8,
        }
    }

    pub fn encode(self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Tag::Anonymous => Ok(()),
            Tag::Context(n) => w.write_u8(n),
            Tag::CommonProfile(n) | Tag::ImplicitProfile(n) => {
                if n <= 0xFFFF {
                    w.write_le_u16(n as u16)
                } else {
                    w.write_le_u32(n)
                }
            }
            Tag::FullyQualified {
                vendor_id,
                profile_num,
                tag_num,
            } => {
                w.write_le_u16(vendor_id)?;
                w.write_le_u16(profile_num)?;
                if tag_num <= 0xFFFF {
                    w.write_le_u16(tag_num as u16)
                } else {
                    w.write_le_u32(tag_num)
                }
            }
        }
    }

    /// Decodes the tag bytes selected by the control byte's tag control bits.
    pub fn decode(control_byte: u8, r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let tag = match (control_byte & TAG_CONTROL_MASK) >> TAG_CONTROL_SHIFT {
            0 => Tag::Anonymous,
            1 => Tag::Context(r.read_u8()?),
            2 => Tag::CommonProfile(r.read_le_u16()? as u32),
            3 => Tag::CommonProfile(r.read_le_u32()?),
            4 => Tag::ImplicitProfile(r.read_le_u16()? as u32),
            5 => Tag::ImplicitProfile(r.read_le_u32()?),
            6 => Tag::FullyQualified {
                vendor_id: r.read_le_u16()?,
                profile_num: r.read_le_u16()?,
                tag_num: r.read_le_u16()? as u32,
            },
            _ => Tag::FullyQualified {
                vendor_id: r.read_le_u16()?,
                profile_num: r.read_le_u16()?,
                tag_num: r.read_le_u32()?,
            },
        };
        Ok(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Anonymous => f.write_str("anon"),
            Tag::Context(n) => write!(f, "ctx:{n}"),
            Tag::CommonProfile(n) => write!(f, "common:{n}"),
            Tag::ImplicitProfile(n) => write!(f, "implicit:{n}"),
            Tag::FullyQualified {
                vendor_id,
                profile_num,
                tag_num,
            } => write!(f, "fq:0x{vendor_id:04X}:0x{profile_num:04X}:{tag_num}"),
        }
    }
}

/// Builds a control byte from a tag and element type.
pub const fn control_byte(tag: Tag, element_type: ElementType) -> u8 {
    (tag.control() << TAG_CONTROL_SHIFT) | element_type as u8
}

#[cfg(test)]
mod tests {
    use super::{control_byte, ElementType, Tag};
    use crate::tlv::{reader::Reader, writer::Writer};
    use crate::DecodeError;

    fn roundtrip(tag: Tag) -> Tag {
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        tag.encode(&mut w).unwrap();
        assert_eq!(w.position(), tag.encoded_len());
        let control = control_byte(tag, ElementType::Null);
        let mut r = Reader::new(w.as_written());
        let decoded = Tag::decode(control, &mut r).unwrap();
        assert!(r.is_empty());
        decoded
    }

    #[test]
    fn tag_forms_roundtrip() {
        for tag in [
            Tag::Anonymous,
            Tag::Context(7),
            Tag::CommonProfile(0x1234),
            Tag::CommonProfile(0x0001_0000),
            Tag::ImplicitProfile(9),
            Tag::ImplicitProfile(0xFFFF_FFFF),
            Tag::FullyQualified {
                vendor_id: 0xFFF1,
                profile_num: 0xDEED,
                tag_num: 1,
            },
            Tag::FullyQualified {
                vendor_id: 0xFFF1,
                profile_num: 0xDEED,
                tag_num: 0xAA55_FEED,
            },
        ] {
            assert_eq!(roundtrip(tag), tag);
        }
    }

    #[test]
    fn tag_control_selects_width() {
        assert_eq!(control_byte(Tag::Anonymous, ElementType::Structure), 0x15);
        assert_eq!(control_byte(Tag::Context(1), ElementType::UInt8), 0x24);
        assert_eq!(control_byte(Tag::CommonProfile(1), ElementType::Null), 0x54);
        assert_eq!(
            control_byte(Tag::CommonProfile(0x10000), ElementType::Null),
            0x74
        );
        let tag = Tag::FullyQualified {
            vendor_id: 0,
            profile_num: 0,
            tag_num: 0x10000,
        };
        assert_eq!(tag.encoded_len(), 8);
    }

    #[test]
    fn reserved_element_types_are_rejected() {
        for code in 0x19..=0x1F {
            assert_eq!(
                ElementType::from_u8(code).unwrap_err(),
                DecodeError::InvalidElementType
            );
        }
        assert!(ElementType::from_u8(0x15).unwrap().is_container());
        assert!(!ElementType::from_u8(0x14).unwrap().is_container());
    }

    #[test]
    fn truncated_tag_is_eof() {
        let mut r = Reader::new(&[0x01]);
        assert_eq!(
            Tag::decode(0x40, &mut r).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn tag_serde_round_trip() {
        let tag = Tag::FullyQualified {
            vendor_id: 0xFFF1,
            profile_num: 0xDEED,
            tag_num: 1,
        };
        let json = serde_json::to_string(&tag).unwrap();
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
    }
}
