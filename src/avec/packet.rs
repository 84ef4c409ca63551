//! Owned representation of a decoded packet.

use alloc::vec::Vec;

use crate::sans::{header::PacketHeader, record::GpsFix};

use super::{FromRecord, FromRecords};

/// A successfully decoded packet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodedPacket {
    pub header: PacketHeader,
    /// Records in the order they appear in the packet.
    pub records: Vec<AvlRecord>,
    /// Record count repeated after the records (`numOfData2`).
    pub trailing_record_count: u8,
    pub crc: u32,
}

impl DecodedPacket {
    /// Whether the record counts before and after the records agree.
    ///
    /// Decoding does not enforce this.
    pub fn counts_match(&self) -> bool {
        self.header.record_count == self.trailing_record_count
    }
}

impl FromRecords for DecodedPacket {
    fn add_header(&mut self, header: &PacketHeader) {
        self.header = *header;
        self.records.reserve(header.record_count as usize);
    }

    fn add_record(&mut self) -> Option<&mut dyn FromRecord> {
        self.records.push(Default::default());
        self.records.last_mut().map(|r| r as _)
    }

    fn add_trailer(&mut self, record_count: u8, crc: u32) {
        self.trailing_record_count = record_count;
        self.crc = crc;
    }
}

/// One timestamped GPS and telemetry sample.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AvlRecord {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub priority: u8,
    pub gps: GpsFix,
    /// Identifier of the IO element which triggered the record, or zero.
    pub io_event_id: u16,
    /// Total number of IO elements declared by the record.
    pub io_count: u16,
    /// Elements of all five groups, by group width (one, two, four, eight,
    /// then variable) and then in the order read.
    pub io_elements: Vec<IoElement>,
}

impl AvlRecord {
    /// Find the first element with an identifier.
    pub fn element(&self, id: u16) -> Option<&IoElement> {
        self.io_elements.iter().find(|e| e.id == id)
    }
}

impl FromRecord for AvlRecord {
    fn add_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    fn add_priority(&mut self, priority: u8) {
        self.priority = priority;
    }

    fn add_gps(&mut self, gps: &GpsFix) {
        self.gps = *gps;
    }

    fn add_event(&mut self, event_id: u16, io_count: u16) {
        self.io_event_id = event_id;
        self.io_count = io_count;
    }

    fn add_element(&mut self, id: u16, value: u64) {
        self.io_elements.push(IoElement {
            id,
            value,
            raw: None,
        });
    }

    fn add_variable(&mut self, id: u16, value: u64, raw: &[u8]) {
        self.io_elements.push(IoElement {
            id,
            value,
            raw: Some(raw.to_vec()),
        });
    }
}

/// A telemetry property of a record.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IoElement {
    pub id: u16,
    /// The value widened to 64 bits. Variable-width values longer than eight
    /// bytes keep only their trailing eight bytes.
    pub value: u64,
    /// The original bytes of a variable-width value.
    pub raw: Option<Vec<u8>>,
}
