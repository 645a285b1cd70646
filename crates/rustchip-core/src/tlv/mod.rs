/// Element cursor over an encoded TLV document.
pub mod cursor;
/// TLV element writer into a caller-owned buffer.
pub mod encoder;
/// Zero-copy little-endian byte reader.
pub mod reader;
/// Tags, element types, and control byte layout.
pub mod tag;
/// Iterate, count, and find over a TLV document.
pub mod utilities;
/// Little-endian byte writer into a caller-owned buffer.
pub mod writer;

pub use cursor::{Element, TlvReader, MAX_CONTAINER_DEPTH};
pub use encoder::TlvWriter;
pub use tag::{ContainerType, ElementType, Tag};
pub use utilities::{count, find, find_by, iterate, TraversalError, Visitor};
