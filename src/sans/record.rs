//! States processing AVL records.

use zerocopy::FromBytes;

use super::io::{Group, N1};

/// Divisor converting raw coordinates into degrees.
pub const COORDINATE_SCALE: f64 = 10_000_000.0;

/// A GPS fix carried by each record.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GpsFix {
    /// Degrees, positive east. Not range-checked.
    pub longitude: f64,
    /// Degrees, positive north. Not range-checked.
    pub latitude: f64,
    /// Metres above sea level.
    pub altitude: u16,
    /// Heading in degrees from north.
    pub angle: u16,
    pub satellites: u8,
    /// Kilometres per hour.
    pub speed: u16,
}

/// The fixed fields opening a record, preceding its IO element groups.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RecordHead {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub priority: u8,
    pub gps: GpsFix,
    /// Identifier of the IO element which triggered the record, or zero.
    pub event_id: u16,
    /// Total number of IO elements declared by the record.
    pub io_count: u16,
}

/// Interpret eight big-endian bytes as milliseconds since the Unix epoch.
pub fn timestamp_from_bytes(r: [u8; 8]) -> i64 {
    i64::from_be_bytes(r)
}

/// Convert a raw coordinate into degrees.
pub fn scale_coordinate(raw: i32) -> f64 {
    raw as f64 / COORDINATE_SCALE
}

/// State token to decode the fixed fields of a record.
#[derive(Debug)]
pub struct Record {
    /// Records following this one.
    pub(super) records_remaining: u8,
}

impl Record {
    pub(super) fn new(records_remaining: u8) -> Self {
        Self { records_remaining }
    }

    /// Transition to another state by decoding the fixed fields of a record.
    ///
    /// Returns the fields, and a successor state token for the first IO
    /// element group.
    pub fn advance(self, r: [u8; 28]) -> (RecordHead, Group<N1>) {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct RawRecord {
            timestamp: [u8; 8],
            priority: u8,
            longitude: [u8; 4],
            latitude: [u8; 4],
            altitude: [u8; 2],
            angle: [u8; 2],
            satellites: u8,
            speed: [u8; 2],
            event_id: [u8; 2],
            io_count: [u8; 2],
        }

        let RawRecord {
            timestamp,
            priority,
            longitude,
            latitude,
            altitude,
            angle,
            satellites,
            speed,
            event_id,
            io_count,
        } = zerocopy::transmute!(r);

        let head = RecordHead {
            timestamp: timestamp_from_bytes(timestamp),
            priority,
            gps: GpsFix {
                longitude: scale_coordinate(i32::from_be_bytes(longitude)),
                latitude: scale_coordinate(i32::from_be_bytes(latitude)),
                altitude: u16::from_be_bytes(altitude),
                angle: u16::from_be_bytes(angle),
                satellites,
                speed: u16::from_be_bytes(speed),
            },
            event_id: u16::from_be_bytes(event_id),
            io_count: u16::from_be_bytes(io_count),
        };

        (head, Group::new(self.records_remaining))
    }
}
