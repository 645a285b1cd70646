use crate::tlv::cursor::MAX_CONTAINER_DEPTH;
use crate::tlv::tag::{control_byte, ContainerType, ElementType, Tag, END_OF_CONTAINER};
use crate::tlv::writer::Writer;
use crate::EncodeError;

/// Writes TLV elements into a caller-owned buffer.
///
/// Integers and string length fields use the narrowest encoding that holds
/// the value. Containers must be closed with [`end_container`](Self::end_container)
/// before [`finish`](Self::finish) succeeds. An element rejected with
/// `BufferTooSmall` writes no bytes.
#[derive(Debug)]
pub struct TlvWriter<'a> {
    w: Writer<'a>,
    open: usize,
}

impl<'a> TlvWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            w: Writer::new(buf),
            open: 0,
        }
    }

    pub fn as_written(&self) -> &[u8] {
        self.w.as_written()
    }

    pub const fn open_containers(&self) -> usize {
        self.open
    }

    /// Returns the encoded document once every container is closed.
    pub fn finish(&self) -> Result<&[u8], EncodeError> {
        if self.open > 0 {
            return Err(EncodeError::UnclosedContainer);
        }
        Ok(self.w.as_written())
    }

    // Writes nothing unless the head and `value_len` value bytes all fit.
    fn put_head(
        &mut self,
        tag: Tag,
        element_type: ElementType,
        value_len: usize,
    ) -> Result<(), EncodeError> {
        let element_len = (1 + tag.encoded_len()).saturating_add(value_len);
        if element_len > self.w.remaining() {
            return Err(EncodeError::BufferTooSmall);
        }
        self.w.write_u8(control_byte(tag, element_type))?;
        tag.encode(&mut self.w)
    }

    pub fn put_unsigned(&mut self, tag: Tag, value: u64) -> Result<(), EncodeError> {
        let (element_type, len) = if value <= u8::MAX as u64 {
            (ElementType::UInt8, 1)
        } else if value <= u16::MAX as u64 {
            (ElementType::UInt16, 2)
        } else if value <= u32::MAX as u64 {
            (ElementType::UInt32, 4)
        } else {
            (ElementType::UInt64, 8)
        };
        self.put_head(tag, element_type, len)?;
        self.w.write_all(&value.to_le_bytes()[..len])
    }

    pub fn put_signed(&mut self, tag: Tag, value: i64) -> Result<(), EncodeError> {
        let (element_type, len) = if (i8::MIN as i64..=i8::MAX as i64).contains(&value) {
            (ElementType::Int8, 1)
        } else if (i16::MIN as i64..=i16::MAX as i64).contains(&value) {
            (ElementType::Int16, 2)
        } else if (i32::MIN as i64..=i32::MAX as i64).contains(&value) {
            (ElementType::Int32, 4)
        } else {
            (ElementType::Int64, 8)
        };
        self.put_head(tag, element_type, len)?;
        self.w.write_all(&value.to_le_bytes()[..len])
    }

    pub fn put_bool(&mut self, tag: Tag, value: bool) -> Result<(), EncodeError> {
        let element_type = if value {
            ElementType::BooleanTrue
        } else {
            ElementType::BooleanFalse
        };
        self.put_head(tag, element_type, 0)
    }

    pub fn put_f32(&mut self, tag: Tag, value: f32) -> Result<(), EncodeError> {
        self.put_head(tag, ElementType::Float32, 4)?;
        self.w.write_le_u32(value.to_bits())
    }

    pub fn put_f64(&mut self, tag: Tag, value: f64) -> Result<(), EncodeError> {
        self.put_head(tag, ElementType::Float64, 8)?;
        self.w.write_le_u64(value.to_bits())
    }

    pub fn put_null(&mut self, tag: Tag) -> Result<(), EncodeError> {
        self.put_head(tag, ElementType::Null, 0)
    }

    pub fn put_str(&mut self, tag: Tag, value: &str) -> Result<(), EncodeError> {
        self.put_string(tag, true, value.as_bytes())
    }

    pub fn put_bytes(&mut self, tag: Tag, value: &[u8]) -> Result<(), EncodeError> {
        self.put_string(tag, false, value)
    }

    fn put_string(&mut self, tag: Tag, utf8: bool, data: &[u8]) -> Result<(), EncodeError> {
        let len = data.len() as u64;
        let width: usize = if len <= u8::MAX as u64 {
            1
        } else if len <= u16::MAX as u64 {
            2
        } else if len <= u32::MAX as u64 {
            4
        } else {
            8
        };
        let element_type = match (utf8, width) {
            (true, 1) => ElementType::Utf8String1,
            (true, 2) => ElementType::Utf8String2,
            (true, 4) => ElementType::Utf8String4,
            (true, _) => ElementType::Utf8String8,
            (false, 1) => ElementType::ByteString1,
            (false, 2) => ElementType::ByteString2,
            (false, 4) => ElementType::ByteString4,
            (false, _) => ElementType::ByteString8,
        };
        self.put_head(tag, element_type, width.saturating_add(data.len()))?;
        self.w.write_all(&len.to_le_bytes()[..width])?;
        self.w.write_all(data)
    }

    pub fn start_container(
        &mut self,
        tag: Tag,
        container: ContainerType,
    ) -> Result<(), EncodeError> {
        if self.open >= MAX_CONTAINER_DEPTH {
            return Err(EncodeError::NestingTooDeep);
        }
        self.put_head(tag, container.element_type(), 0)?;
        self.open += 1;
        Ok(())
    }

    pub fn end_container(&mut self) -> Result<(), EncodeError> {
        if self.open == 0 {
            return Err(EncodeError::NoOpenContainer);
        }
        self.w.write_u8(END_OF_CONTAINER)?;
        self.open -= 1;
        Ok(())
    }
}
