//! States processing the packet header.

use either::Either::{self, Left, Right};
use zerocopy::FromBytes;

use super::{record::Record, trailer::Trailer};

/// The fixed fields opening every packet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Framing marker, always zero in a healthy packet.
    pub preamble: u32,
    /// Number of bytes from the codec identifier through the trailing record
    /// count, inclusive.
    pub data_length: u32,
    pub codec_id: u8,
    /// Number of records declared by the header (`numOfData1`).
    pub record_count: u8,
}

/// State token to decode a packet header.
#[derive(Debug)]
pub struct Header(pub(super) ());

impl Header {
    /// Transition to another state by decoding a packet header.
    ///
    /// Returns the header fields, and a successor state token.
    pub fn advance(self, r: [u8; 10]) -> (PacketHeader, Either<Record, Trailer>) {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct RawHeader {
            preamble: [u8; 4],
            data_length: [u8; 4],
            codec_id: u8,
            record_count: u8,
        }

        let RawHeader {
            preamble,
            data_length,
            codec_id,
            record_count,
        } = zerocopy::transmute!(r);

        let header = PacketHeader {
            preamble: u32::from_be_bytes(preamble),
            data_length: u32::from_be_bytes(data_length),
            codec_id,
            record_count,
        };

        let successor = if record_count != 0 {
            Left(Record::new(record_count - 1))
        } else {
            Right(Trailer(()))
        };

        (header, successor)
    }
}
