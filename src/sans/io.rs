//! States processing the IO element groups of a record.
//!
//! Every record carries five groups in a fixed order: one-, two-, four- and
//! eight-byte values, followed by length-prefixed values of any width. Each
//! group opens with its own element count. Element values are widened to
//! `u64`, so a record's elements read as one flat sequence in wire order.

use core::marker::PhantomData;

use either::Either::{self, Left, Right};

use super::{record::Record, trailer::Trailer};

/// Widen big-endian bytes to a `u64`.
///
/// Values shorter than eight bytes are zero-extended. Longer values keep
/// only their trailing (least significant) eight bytes.
pub fn widen(r: &[u8]) -> u64 {
    let r = &r[r.len().saturating_sub(8)..];

    let mut bytes = [0; 8];
    bytes[8 - r.len()..].copy_from_slice(r);

    u64::from_be_bytes(bytes)
}

/// A fixed value width shared by all elements of a group.
pub trait Width {
    /// The data storing a value of this width.
    type From;
    /// The state following a group of this width.
    type Next;

    /// Widen a value of this width to a `u64`.
    fn widen(r: Self::From) -> u64;

    /// Construct the state following a group of this width.
    fn next(records_remaining: u8) -> Self::Next;
}

macro_rules! width {
    ($t:ident, $n:literal, $next:ty, $(#[$attr:meta])*) => {
        $(#[$attr])*
        #[derive(Debug)]
        pub struct $t;

        impl Width for $t {
            type From = [u8; $n];
            type Next = $next;

            fn widen(r: Self::From) -> u64 {
                widen(&r)
            }

            fn next(records_remaining: u8) -> Self::Next {
                <$next>::new(records_remaining)
            }
        }
    };
}

width!(N1, 1, Group<N2>, /** One-byte values. */);
width!(N2, 2, Group<N4>, /** Two-byte values. */);
width!(N4, 4, Group<N8>, /** Four-byte values. */);
width!(N8, 8, VariableGroup, /** Eight-byte values. */);

/// State token to decode the element count of a fixed-width group.
#[derive(Debug)]
pub struct Group<W> {
    records_remaining: u8,
    _phantom: PhantomData<W>,
}

impl<W: Width> Group<W> {
    pub(super) fn new(records_remaining: u8) -> Self {
        Self {
            records_remaining,
            _phantom: PhantomData,
        }
    }

    /// Transition to another state by decoding the element count of a group.
    ///
    /// Returns the element count, and a successor state token.
    pub fn advance(self, r: [u8; 2]) -> (u16, Either<Element<W>, W::Next>) {
        let count = u16::from_be_bytes(r);

        let successor = if count != 0 {
            Left(Element {
                elements_remaining: count - 1,
                records_remaining: self.records_remaining,
                _phantom: PhantomData,
            })
        } else {
            Right(W::next(self.records_remaining))
        };

        (count, successor)
    }
}

/// State token to decode an element of a fixed-width group.
#[derive(Debug)]
pub struct Element<W> {
    elements_remaining: u16,
    records_remaining: u8,
    _phantom: PhantomData<W>,
}

impl<W: Width> Element<W> {
    /// Transition to another state by decoding an element identifier and its
    /// value.
    ///
    /// Returns the identifier, the widened value, and a successor state token.
    pub fn advance(self, id: [u8; 2], value: W::From) -> (u16, u64, Either<Self, W::Next>) {
        let id = u16::from_be_bytes(id);
        let value = W::widen(value);

        let successor = if self.elements_remaining != 0 {
            Left(Self {
                elements_remaining: self.elements_remaining - 1,
                ..self
            })
        } else {
            Right(W::next(self.records_remaining))
        };

        (id, value, successor)
    }
}

/// State token to decode the element count of the variable-width group.
#[derive(Debug)]
pub struct VariableGroup {
    records_remaining: u8,
}

impl VariableGroup {
    fn new(records_remaining: u8) -> Self {
        Self { records_remaining }
    }

    /// Transition to another state by decoding the element count of the
    /// variable-width group.
    ///
    /// Returns the element count, and a successor state token. This is the
    /// final group of a record, so an empty group leads to the next record or
    /// to the trailer.
    pub fn advance(
        self,
        r: [u8; 2],
    ) -> (u16, Either<VariableElement, Either<Record, Trailer>>) {
        let count = u16::from_be_bytes(r);

        let successor = if count != 0 {
            Left(VariableElement {
                elements_remaining: count - 1,
                records_remaining: self.records_remaining,
            })
        } else {
            Right(end_of_record(self.records_remaining))
        };

        (count, successor)
    }
}

/// State token to decode the identifier and length of a variable-width
/// element.
#[derive(Debug)]
pub struct VariableElement {
    elements_remaining: u16,
    records_remaining: u8,
}

impl VariableElement {
    /// Transition to another state by decoding an element identifier and the
    /// length of its value.
    ///
    /// Returns the identifier, and a successor state token.
    pub fn advance(self, r: [u8; 4]) -> (u16, VariableValue) {
        let id = u16::from_be_bytes([r[0], r[1]]);
        let length = u16::from_be_bytes([r[2], r[3]]);

        let successor = VariableValue {
            length,
            elements_remaining: self.elements_remaining,
            records_remaining: self.records_remaining,
        };

        (id, successor)
    }
}

/// State token to decode the value of a variable-width element.
#[derive(Debug)]
pub struct VariableValue {
    length: u16,
    elements_remaining: u16,
    records_remaining: u8,
}

impl VariableValue {
    /// Number of bytes expected by [`VariableValue::advance`].
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// Transition to another state by decoding the value of a variable-width
    /// element.
    ///
    /// **This method expects exactly [`VariableValue::length`] bytes.**
    ///
    /// Returns the widened value, and a successor state token.
    pub fn advance(
        self,
        r: &[u8],
    ) -> (u64, Either<VariableElement, Either<Record, Trailer>>) {
        debug_assert_eq!(r.len(), self.length());

        let successor = if self.elements_remaining != 0 {
            Left(VariableElement {
                elements_remaining: self.elements_remaining - 1,
                records_remaining: self.records_remaining,
            })
        } else {
            Right(end_of_record(self.records_remaining))
        };

        (widen(r), successor)
    }
}

fn end_of_record(records_remaining: u8) -> Either<Record, Trailer> {
    if records_remaining != 0 {
        Left(Record::new(records_remaining - 1))
    } else {
        Right(Trailer(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widens_eight_bytes() {
        assert_eq!(N8::widen([0, 0, 0, 0, 0, 0, 0, 5]), 5);
        assert_eq!(N8::widen([0xFF; 8]), u64::MAX);
    }

    #[test]
    fn widens_short_values_with_zeros() {
        assert_eq!(N1::widen([0xFF]), 0xFF);
        assert_eq!(N2::widen([0x30, 0xA2]), 12450);
        assert_eq!(widen(&[1, 2, 3]), 0x010203);
        assert_eq!(widen(&[]), 0);
    }

    #[test]
    fn widens_long_values_from_trailing_bytes() {
        let r = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        assert_eq!(widen(&r), 0x030405060708090A);
    }

    #[test]
    fn empty_group_skips_to_next_width() {
        let (count, successor) = Group::<N1>::new(0).advance([0, 0]);
        assert_eq!(count, 0);
        assert!(matches!(successor, Right(Group::<N2> { .. })));
    }

    #[test]
    fn elements_counted_down() {
        let (count, successor) = Group::<N4>::new(0).advance([0, 2]);
        assert_eq!(count, 2);

        let Left(element) = successor else {
            panic!("expected an element");
        };
        let (id, value, successor) = element.advance([0, 16], [0, 1, 0xE2, 0x40]);
        assert_eq!((id, value), (16, 123456));

        let Left(element) = successor else {
            panic!("expected a second element");
        };
        let (_, _, successor) = element.advance([0, 17], [0, 0, 0, 1]);
        assert!(matches!(successor, Right(Group::<N8> { .. })));
    }

    #[test]
    fn variable_group_ends_record() {
        let (_, successor) = VariableGroup::new(1).advance([0, 0]);
        assert!(matches!(successor, Right(Left(Record { records_remaining: 0 }))));

        let (_, successor) = VariableGroup::new(0).advance([0, 0]);
        assert!(matches!(successor, Right(Right(Trailer(())))));
    }

    #[test]
    fn variable_element_reports_length() {
        let (_, successor) = VariableGroup::new(0).advance([0, 1]);
        let Left(element) = successor else {
            panic!("expected an element");
        };

        let (id, value) = element.advance([0x01, 0x01, 0x00, 0x03]);
        assert_eq!(id, 257);
        assert_eq!(value.length(), 3);

        let (value, successor) = value.advance(&[1, 2, 3]);
        assert_eq!(value, 66051);
        assert!(matches!(successor, Right(Right(_))));
    }
}
