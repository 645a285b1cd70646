//! One depth-aware walk over a TLV document, driven by a visitor.
//!
//! [`count`], [`find`] and [`find_by`] are visitors over [`iterate`], so all
//! three share document order, recursion, and error semantics. Memory use is
//! proportional to nesting depth, never to document size.

use core::convert::Infallible;
use core::fmt;
use core::ops::ControlFlow;

use crate::tlv::cursor::TlvReader;
use crate::tlv::tag::Tag;
use crate::DecodeError;

/// Callback invoked once per visited element.
///
/// `reader` is positioned on the element; `depth` is 0 for elements at the
/// level where the traversal started. Returning `Break` stops the traversal
/// and hands the value back to the caller; returning `Err` aborts it.
///
/// Closures of the shape
/// `FnMut(&TlvReader<'a>, usize) -> Result<ControlFlow<B>, E>` are visitors.
pub trait Visitor<'a> {
    type Break;
    type Error;

    fn visit(
        &mut self,
        reader: &TlvReader<'a>,
        depth: usize,
    ) -> Result<ControlFlow<Self::Break>, Self::Error>;
}

impl<'a, F, B, E> Visitor<'a> for F
where
    F: FnMut(&TlvReader<'a>, usize) -> Result<ControlFlow<B>, E>,
{
    type Break = B;
    type Error = E;

    fn visit(&mut self, reader: &TlvReader<'a>, depth: usize) -> Result<ControlFlow<B>, E> {
        self(reader, depth)
    }
}

/// Why a traversal failed: malformed input, or the visitor's own error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalError<E> {
    Decode(DecodeError),
    Visitor(E),
}

impl<E> From<DecodeError> for TraversalError<E> {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl<E: fmt::Display> fmt::Display for TraversalError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "decode error: {err}"),
            Self::Visitor(err) => write!(f, "visitor aborted: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for TraversalError<E> {}

/// Visits every element reachable from the reader's position in document order.
///
/// An unpositioned reader is first advanced to its first element. With
/// `recurse`, each container is visited and then its contents, one level
/// deeper, before moving past its closing marker; without it, containers are
/// visited as opaque elements (their contents are still scanned for
/// well-formedness).
///
/// The caller's reader is never moved; the walk runs on a copy.
pub fn iterate<'a, V>(
    reader: &TlvReader<'a>,
    visitor: &mut V,
    recurse: bool,
) -> Result<ControlFlow<V::Break>, TraversalError<V::Error>>
where
    V: Visitor<'a>,
{
    let mut cursor = *reader;
    walk(&mut cursor, 0, visitor, recurse)
}

fn walk<'a, V>(
    cursor: &mut TlvReader<'a>,
    depth: usize,
    visitor: &mut V,
    recurse: bool,
) -> Result<ControlFlow<V::Break>, TraversalError<V::Error>>
where
    V: Visitor<'a>,
{
    if cursor.element().is_none() && !cursor.next()? {
        return Ok(ControlFlow::Continue(()));
    }

    loop {
        let flow = visitor
            .visit(cursor, depth)
            .map_err(TraversalError::Visitor)?;
        if let ControlFlow::Break(b) = flow {
            return Ok(ControlFlow::Break(b));
        }

        if recurse && cursor.element().is_some_and(|e| e.is_container()) {
            cursor.enter_container()?;
            if let ControlFlow::Break(b) = walk(cursor, depth + 1, visitor, recurse)? {
                return Ok(ControlFlow::Break(b));
            }
            cursor.exit_container()?;
        }

        if !cursor.next()? {
            return Ok(ControlFlow::Continue(()));
        }
    }
}

struct Counter(usize);

impl<'a> Visitor<'a> for Counter {
    type Break = Infallible;
    type Error = Infallible;

    fn visit(
        &mut self,
        _reader: &TlvReader<'a>,
        _depth: usize,
    ) -> Result<ControlFlow<Infallible>, Infallible> {
        self.0 += 1;
        Ok(ControlFlow::Continue(()))
    }
}

/// Number of elements [`iterate`] would visit.
pub fn count(reader: &TlvReader<'_>, recurse: bool) -> Result<usize, DecodeError> {
    let mut counter = Counter(0);
    match iterate(reader, &mut counter, recurse) {
        Ok(_) => Ok(counter.0),
        Err(TraversalError::Decode(err)) => Err(err),
        Err(TraversalError::Visitor(never)) => match never {},
    }
}

struct Finder<M> {
    matcher: M,
}

impl<'a, M> Visitor<'a> for Finder<M>
where
    M: FnMut(&TlvReader<'a>, usize) -> bool,
{
    type Break = TlvReader<'a>;
    type Error = Infallible;

    fn visit(
        &mut self,
        reader: &TlvReader<'a>,
        depth: usize,
    ) -> Result<ControlFlow<TlvReader<'a>>, Infallible> {
        if (self.matcher)(reader, depth) {
            Ok(ControlFlow::Break(*reader))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    }
}

/// First reachable element carrying `tag`, as an independent reader
/// positioned on it. `Ok(None)` when no reachable element matches.
pub fn find<'a>(
    reader: &TlvReader<'a>,
    tag: Tag,
    recurse: bool,
) -> Result<Option<TlvReader<'a>>, DecodeError> {
    find_by(reader, |r: &TlvReader<'a>, _| r.tag() == Some(tag), recurse)
}

/// First reachable element accepted by `matcher`, which receives the element
/// and its depth.
pub fn find_by<'a, M>(
    reader: &TlvReader<'a>,
    matcher: M,
    recurse: bool,
) -> Result<Option<TlvReader<'a>>, DecodeError>
where
    M: FnMut(&TlvReader<'a>, usize) -> bool,
{
    let mut finder = Finder { matcher };
    match iterate(reader, &mut finder, recurse) {
        Ok(ControlFlow::Break(found)) => Ok(Some(found)),
        Ok(ControlFlow::Continue(())) => Ok(None),
        Err(TraversalError::Decode(err)) => Err(err),
        Err(TraversalError::Visitor(never)) => match never {},
    }
}
