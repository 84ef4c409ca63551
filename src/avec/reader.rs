//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, vec, vec::Vec};

use log::warn;
use thiserror::Error;

use super::{FromRecords, cursor::Cursor, packet::DecodedPacket, slice};

extern crate std;

/// Largest packet accepted from a reader, in bytes.
pub const MAX_PACKET_SIZE: usize = 1280;

/// Preamble and data length fields, read before the rest of the packet.
const PREFIX_SIZE: usize = 8;

/// Width of the trailing checksum field.
const CRC_SIZE: usize = 4;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The data length field describes a packet larger than
    /// [`MAX_PACKET_SIZE`].
    #[error("Packet of {0} bytes exceeds the maximum of 1280.")]
    Oversized(usize),
    /// The packet failed to decode.
    #[error(transparent)]
    Decode(#[from] slice::Error),
}

/// Read one complete packet from a reader and decode it, publishing to a
/// receiver.
///
/// The packet is framed by its data length field, so exactly one packet is
/// consumed from the reader. It is decoded only once all of its bytes have
/// been read.
///
/// This method is also re-exported as `codec8e::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read, o: &mut impl FromRecords) -> Result<(), Error> {
    let r = read_packet(r)?;
    slice::decode(&r, o)?;
    Ok(())
}

/// Read one complete packet from a reader and decode it.
///
/// _Requires Cargo feature `std`._
pub fn decode_packet(r: &mut impl Read) -> Result<DecodedPacket, Error> {
    let mut packet = DecodedPacket::default();
    decode(r, &mut packet)?;
    Ok(packet)
}

/// Take the bytes of exactly one packet from a reader.
fn read_packet(r: &mut impl Read) -> Result<Vec<u8>, Error> {
    let mut prefix = [0; PREFIX_SIZE];
    r.read_exact(&mut prefix)?;

    let c = &mut Cursor::new(&prefix);
    let _preamble = c.read_u32().map_err(slice::Error::from)?;
    let data_length = c.read_u32().map_err(slice::Error::from)?;

    let size = PREFIX_SIZE
        .saturating_add(data_length as usize)
        .saturating_add(CRC_SIZE);

    if size > MAX_PACKET_SIZE {
        warn!("Refusing to read {size} byte packet.");
        Err(Error::Oversized(size))?;
    }

    let mut buf = vec![0; size];
    buf[..PREFIX_SIZE].copy_from_slice(&prefix);
    r.read_exact(&mut buf[PREFIX_SIZE..])?;

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor as IoCursor};

    use super::*;
    use crate::sans::health::HealthFault;

    #[test]
    fn rejects_oversized_length_without_reading() {
        let r = [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
        let err = decode_packet(&mut IoCursor::new(r)).unwrap_err();
        assert!(matches!(err, Error::Oversized(_)));
    }

    #[test]
    fn short_stream_is_io_error() {
        let r = [0, 0, 0, 0, 0, 0, 0, 0x30, 0x8E, 0x01];
        let err = decode_packet(&mut IoCursor::new(r)).unwrap_err();
        assert!(matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn small_packet_fails_health_check() {
        let r = [0, 0, 0, 0, 0, 0, 0, 2, 0x8E, 0, 0, 0, 0, 0, 0];
        let err = decode_packet(&mut IoCursor::new(r)).unwrap_err();
        let Error::Decode(slice::Error::Health(err)) = err else {
            panic!("expected a health check failure");
        };
        assert_eq!(err.fault(), HealthFault::PacketTooSmall(14));
    }
}
