use crate::tlv::reader::Reader;
use crate::tlv::tag::{ContainerType, ElementType, Tag, ELEMENT_TYPE_MASK, END_OF_CONTAINER};
use crate::DecodeError;

/// Deepest container nesting a [`TlvReader`] will enter or skip over.
///
/// TLV input is untrusted wire data; the bound caps both the recursion depth of
/// [`iterate`](crate::tlv::utilities::iterate) and the nesting counter used when
/// skipping an un-entered container.
pub const MAX_CONTAINER_DEPTH: usize = 16;

/// A decoded element head plus a borrowed view of its value bytes.
///
/// Containers carry an empty value; their contents follow in the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element<'a> {
    tag: Tag,
    element_type: ElementType,
    value: &'a [u8],
}

impl<'a> Element<'a> {
    pub const fn tag(&self) -> Tag {
        self.tag
    }

    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Raw little-endian value bytes (string content for string types).
    pub const fn raw_value(&self) -> &'a [u8] {
        self.value
    }

    pub const fn is_container(&self) -> bool {
        self.element_type.is_container()
    }

    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        if !self.element_type.is_unsigned_integer() {
            return Err(DecodeError::WrongType);
        }
        Reader::new(self.value).read_le_uint(self.value.len())
    }

    pub fn as_i64(&self) -> Result<i64, DecodeError> {
        if !self.element_type.is_signed_integer() {
            return Err(DecodeError::WrongType);
        }
        let raw = Reader::new(self.value).read_le_uint(self.value.len())?;
        let unused = 64 - (self.value.len() as u32) * 8;
        Ok(((raw << unused) as i64) >> unused)
    }

    /// Unsigned value narrowed to `T`.
    pub fn as_unsigned<T: TryFrom<u64>>(&self) -> Result<T, DecodeError> {
        T::try_from(self.as_u64()?).map_err(|_| DecodeError::ValueOutOfRange)
    }

    /// Signed value narrowed to `T`.
    pub fn as_signed<T: TryFrom<i64>>(&self) -> Result<T, DecodeError> {
        T::try_from(self.as_i64()?).map_err(|_| DecodeError::ValueOutOfRange)
    }

    pub fn as_bool(&self) -> Result<bool, DecodeError> {
        match self.element_type {
            ElementType::BooleanFalse => Ok(false),
            ElementType::BooleanTrue => Ok(true),
            _ => Err(DecodeError::WrongType),
        }
    }

    pub fn as_f32(&self) -> Result<f32, DecodeError> {
        match self.element_type {
            ElementType::Float32 => {
                let bits = Reader::new(self.value).read_le_u32()?;
                Ok(f32::from_bits(bits))
            }
            _ => Err(DecodeError::WrongType),
        }
    }

    /// Either floating point width, widened to `f64`.
    pub fn as_f64(&self) -> Result<f64, DecodeError> {
        match self.element_type {
            ElementType::Float32 => self.as_f32().map(f64::from),
            ElementType::Float64 => {
                let bits = Reader::new(self.value).read_le_u64()?;
                Ok(f64::from_bits(bits))
            }
            _ => Err(DecodeError::WrongType),
        }
    }

    pub fn as_str(&self) -> Result<&'a str, DecodeError> {
        if !self.element_type.is_utf8_string() {
            return Err(DecodeError::WrongType);
        }
        core::str::from_utf8(self.value).map_err(|_| DecodeError::InvalidUtf8)
    }

    pub fn as_bytes(&self) -> Result<&'a [u8], DecodeError> {
        if !self.element_type.is_byte_string() {
            return Err(DecodeError::WrongType);
        }
        Ok(self.value)
    }

    pub fn is_null(&self) -> bool {
        self.element_type == ElementType::Null
    }
}

/// Reads one element head and its value, leaving `r` after the value.
fn decode_element<'a>(r: &mut Reader<'a>) -> Result<Element<'a>, DecodeError> {
    let control = r.read_u8()?;
    let element_type = ElementType::from_u8(control & ELEMENT_TYPE_MASK)?;
    let tag = Tag::decode(control, r)?;
    if element_type == ElementType::EndOfContainer && tag != Tag::Anonymous {
        return Err(DecodeError::InvalidTag);
    }

    let len = match element_type.length_field_len() {
        Some(width) => {
            usize::try_from(r.read_le_uint(width)?).map_err(|_| DecodeError::InvalidLength)?
        }
        None => element_type.fixed_value_len().unwrap_or(0),
    };
    let value = r.read_exact(len)?;

    Ok(Element {
        tag,
        element_type,
        value,
    })
}

/// Cursor over a TLV document.
///
/// The reader is `Copy`: a copy is an independent cursor over the same buffer
/// with its own position, so a caller can hand out a located element without
/// sharing traversal state.
///
/// A new reader is not positioned on any element; call [`next`](Self::next)
/// to move onto the first one.
#[derive(Debug, Clone, Copy)]
pub struct TlvReader<'a> {
    bytes: Reader<'a>,
    current: Option<Element<'a>>,
    depth: usize,
}

impl<'a> TlvReader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            bytes: Reader::new(buf),
            current: None,
            depth: 0,
        }
    }

    /// Element under the cursor, if positioned on one.
    pub const fn element(&self) -> Option<Element<'a>> {
        self.current
    }

    /// Element under the cursor, or `InvalidState` when not positioned.
    pub fn current(&self) -> Result<Element<'a>, DecodeError> {
        self.current.ok_or(DecodeError::InvalidState)
    }

    pub fn tag(&self) -> Option<Tag> {
        self.current.map(|e| e.tag())
    }

    pub fn element_type(&self) -> Option<ElementType> {
        self.current.map(|e| e.element_type())
    }

    /// Number of containers entered from the start of the document.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Offset of the next unread byte.
    pub const fn position(&self) -> usize {
        self.bytes.position()
    }

    /// Advances to the next element in the current container.
    ///
    /// Returns `Ok(false)` at the end of the top-level stream, or when the
    /// closing marker of the current container is reached. The marker itself
    /// is left for [`exit_container`](Self::exit_container).
    pub fn next(&mut self) -> Result<bool, DecodeError> {
        if let Some(current) = self.current.take() {
            if current.is_container() {
                self.skip_container()?;
            }
        }

        if self.bytes.is_empty() {
            return if self.depth > 0 {
                Err(DecodeError::UnterminatedContainer)
            } else {
                Ok(false)
            };
        }

        if self.bytes.peek_u8()? == END_OF_CONTAINER {
            return if self.depth > 0 {
                Ok(false)
            } else {
                Err(DecodeError::UnexpectedEndOfContainer)
            };
        }

        self.current = Some(decode_element(&mut self.bytes)?);
        Ok(true)
    }

    /// Steps into the container under the cursor.
    ///
    /// The reader is left unpositioned inside the container.
    pub fn enter_container(&mut self) -> Result<ContainerType, DecodeError> {
        let container = self
            .current()?
            .element_type()
            .container_type()
            .ok_or(DecodeError::WrongType)?;
        if self.depth >= MAX_CONTAINER_DEPTH {
            return Err(DecodeError::NestingTooDeep);
        }
        self.current = None;
        self.depth += 1;
        Ok(container)
    }

    /// Skips the rest of the current container and consumes its closing marker.
    pub fn exit_container(&mut self) -> Result<(), DecodeError> {
        if self.depth == 0 {
            return Err(DecodeError::InvalidState);
        }
        while self.next()? {}
        self.bytes.read_u8()?;
        self.depth -= 1;
        self.current = None;
        Ok(())
    }

    // Scans forward past the contents and closing marker of an un-entered
    // container without recursion.
    fn skip_container(&mut self) -> Result<(), DecodeError> {
        let mut open = 1usize;
        if self.depth + open > MAX_CONTAINER_DEPTH {
            return Err(DecodeError::NestingTooDeep);
        }
        while open > 0 {
            if self.bytes.is_empty() {
                return Err(DecodeError::UnterminatedContainer);
            }
            let element = decode_element(&mut self.bytes)?;
            if element.element_type() == ElementType::EndOfContainer {
                open -= 1;
            } else if element.is_container() {
                open += 1;
                if self.depth + open > MAX_CONTAINER_DEPTH {
                    return Err(DecodeError::NestingTooDeep);
                }
            }
        }
        Ok(())
    }
}
