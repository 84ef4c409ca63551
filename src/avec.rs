//! Convenience interfaces for common decoding patterns.
//!
//! [`decode`] produces an owned [`DecodedPacket`]. The drivers in [`slice`] and
//! [`reader`] instead publish to the [`FromRecords`] and [`FromRecord`]
//! traits, so records can be decoded directly into application types.
//!
//! In many cases (when the elements of interest are known), [`FromRecord`] can
//! be derived. See the [`FromRecord`](macro@FromRecord) macro for details.

pub mod cursor;
pub mod packet;
#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

use alloc::vec::Vec;

use crate::sans::{header::PacketHeader, record::GpsFix};

use packet::DecodedPacket;

/// Decode a complete packet held in a slice.
///
/// Nothing is returned unless the whole packet decodes.
pub fn decode(r: &[u8]) -> Result<DecodedPacket, slice::Error> {
    let mut packet = DecodedPacket::default();
    slice::decode(r, &mut packet)?;
    Ok(packet)
}

/// Produce record receivers for a packet.
///
/// The default implementation of each `add_` method other than
/// [`FromRecords::add_record`] ignores received values.
#[allow(unused_variables)]
pub trait FromRecords {
    /// Add the packet header.
    fn add_header(&mut self, header: &PacketHeader) {}
    /// Retrieve a receiver for the next record, if one exists.
    fn add_record(&mut self) -> Option<&mut dyn FromRecord>;
    /// Add the trailing record count and checksum.
    fn add_trailer(&mut self, record_count: u8, crc: u32) {}
}

impl<T: FromRecord + Default> FromRecords for Vec<T> {
    fn add_record(&mut self) -> Option<&mut dyn FromRecord> {
        self.push(Default::default());
        self.last_mut().map(|r| r as _)
    }
}

/// Derive [`FromRecord`] for a struct representing a single record.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a single IO element, add the `io(N)` attribute to an
/// `Option<T>` struct field, where `N` is the element identifier and `T` is an
/// integer type. The widened value is stored if it fits in `T`. Additional
/// values received for the same element will replace earlier ones.
///
/// To receive the fixed fields of a record, supply `timestamp` (`i64`),
/// `priority` (`u8`), `gps` ([`GpsFix`]) or `event` (`u16`) in place of an
/// element identifier.
///
/// ```
/// #[derive(Debug, Default, FromRecord)]
/// struct Sample {
///     #[io(timestamp)]
///     timestamp: Option<i64>,
///     #[io(gps)]
///     gps: Option<GpsFix>,
///     #[io(239)]
///     ignition: Option<u8>,
///     #[io(66)]
///     external_voltage: Option<u16>,
/// }
/// ```
///
/// To receive raw variable-width values, or to accumulate values of any
/// width, supply an accumulator closure. Since the value type cannot be
/// inferred, the second argument must be typed. A closure taking `&[u8]`
/// receives the original bytes of variable-width elements.
///
/// ```
/// #[derive(Debug, Default, FromRecord)]
/// struct Sample {
///     #[io(11, |v, x: &[u8]| v.extend_from_slice(x))]
///     iccid: Vec<u8>,
///     #[io(16, |v, x: u32| *v += x as u64)]
///     odometer: u64,
/// }
/// ```
#[cfg(feature = "derive")]
pub use codec8e_derive::FromRecord;

/// Receive the fields of a record.
///
/// Elements are published in the order they appear in the packet: the one-,
/// two-, four- and eight-byte groups, then the variable-width group.
///
/// The default implementation of each method ignores received values, except
/// [`FromRecord::add_variable`], which forwards the widened value to
/// [`FromRecord::add_element`].
///
/// See the [`FromRecord`](macro@FromRecord) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromRecord {
    /// Add the record timestamp, in milliseconds since the Unix epoch.
    fn add_timestamp(&mut self, timestamp: i64) {}
    /// Add the record priority.
    fn add_priority(&mut self, priority: u8) {}
    /// Add the GPS fix.
    fn add_gps(&mut self, gps: &GpsFix) {}
    /// Add the triggering event identifier and the declared element count.
    fn add_event(&mut self, event_id: u16, io_count: u16) {}
    /// Add a fixed-width element, widened to a `u64`.
    fn add_element(&mut self, id: u16, value: u64) {}
    /// Add a variable-width element, widened to a `u64`, with its original
    /// bytes.
    fn add_variable(&mut self, id: u16, value: u64, raw: &[u8]) {
        self.add_element(id, value);
    }
}
