//! Slice-based decoder implementation.

use either::Either::{self, Left, Right};
use log::{debug, trace, warn};
use thiserror::Error;

use crate::sans::{
    Decoder,
    health::PacketHealthError,
    io::{Group, VariableGroup, Width},
    record::Record,
    trailer::{TRAILER_SIZE, Trailer},
};

use super::{
    FromRecord, FromRecords,
    cursor::{Cursor, TruncatedBuffer},
};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// The packet failed its health check.
    #[error(transparent)]
    Health(#[from] PacketHealthError),
    /// A healthy packet described more data than it holds.
    #[error(transparent)]
    Truncated(#[from] TruncatedBuffer),
    /// The records ended before the trailer, leaving unclaimed bytes.
    #[error("{0} unclaimed bytes between the last record and the trailer.")]
    Unclaimed(usize),
}

/// Decode a complete packet held in a slice, publishing to a receiver.
///
/// The packet is health-checked before anything is published. A structural
/// error after that point ends decoding, but values already published to the
/// receiver are not withdrawn.
///
/// This method is also re-exported as `codec8e::avec::decode_slice`.
pub fn decode(r: &[u8], o: &mut impl FromRecords) -> Result<(), Error> {
    let state = Decoder::advance(r)
        .inspect_err(|err| warn!("Rejected packet: {}", err.fault()))?;

    let c = &mut Cursor::new(r);

    let (header, mut successor) = state.advance(c.take()?);
    debug!(
        "Decoding {} records from {} byte packet.",
        header.record_count,
        r.len()
    );
    o.add_header(&header);

    let trailer = loop {
        successor = match successor {
            Left(state) => decode_record(state, c, o)?,
            Right(state) => break state,
        };
    };

    decode_trailer(trailer, header.record_count, c, o)
}

fn decode_record(
    state: Record,
    c: &mut Cursor,
    o: &mut impl FromRecords,
) -> Result<Either<Record, Trailer>, Error> {
    let (head, group) = state.advance(c.take()?);
    trace!("Record at {} with {} elements.", head.timestamp, head.io_count);

    // Shadow the packet receiver with that of a single record.
    let mut o = o.add_record();

    if let Some(o) = &mut o {
        o.add_timestamp(head.timestamp);
        o.add_priority(head.priority);
        o.add_gps(&head.gps);
        o.add_event(head.event_id, head.io_count);
    }

    let group = decode_group(group, c, o.as_deref_mut())?;
    let group = decode_group(group, c, o.as_deref_mut())?;
    let group = decode_group(group, c, o.as_deref_mut())?;
    let group = decode_group(group, c, o.as_deref_mut())?;

    decode_variable_group(group, c, o.as_deref_mut())
}

fn decode_group<W: Width<From = [u8; N]>, O: FromRecord + ?Sized, const N: usize>(
    state: Group<W>,
    c: &mut Cursor,
    mut o: Option<&mut O>,
) -> Result<W::Next, Error> {
    let (count, successor) = state.advance(c.take()?);
    trace!("Group of {count} {N} byte elements.");

    let mut state = match successor {
        Left(state) => state,
        Right(next) => return Ok(next),
    };

    loop {
        let (id, value, successor) = state.advance(c.take()?, c.take()?);

        if let Some(o) = &mut o {
            o.add_element(id, value);
        }

        state = match successor {
            Left(state) => state,
            Right(next) => return Ok(next),
        };
    }
}

fn decode_variable_group<O: FromRecord + ?Sized>(
    state: VariableGroup,
    c: &mut Cursor,
    mut o: Option<&mut O>,
) -> Result<Either<Record, Trailer>, Error> {
    let (count, successor) = state.advance(c.take()?);
    trace!("Group of {count} variable width elements.");

    let mut state = match successor {
        Left(state) => state,
        Right(next) => return Ok(next),
    };

    loop {
        let (id, value_state) = state.advance(c.take()?);
        let bytes = c.take_slice(value_state.length())?;
        let (value, successor) = value_state.advance(bytes);

        if let Some(o) = &mut o {
            o.add_variable(id, value, bytes);
        }

        state = match successor {
            Left(state) => state,
            Right(next) => return Ok(next),
        };
    }
}

fn decode_trailer(
    state: Trailer,
    expected: u8,
    c: &mut Cursor,
    o: &mut impl FromRecords,
) -> Result<(), Error> {
    // The trailer is the final five bytes of the packet.
    if c.remaining() > TRAILER_SIZE {
        Err(Error::Unclaimed(c.remaining() - TRAILER_SIZE))?
    }

    let (record_count, crc) = state.advance(c.take()?);

    if record_count != expected {
        debug!("Trailer counts {record_count} records, header counts {expected}.");
    }

    o.add_trailer(record_count, crc);

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::sans::{check::compute_crc, health::HealthFault};

    fn seal(body: &[u8]) -> Vec<u8> {
        let mut r = Vec::new();
        r.extend_from_slice(&[0; 4]);
        r.extend_from_slice(&(body.len() as u32).to_be_bytes());
        r.extend_from_slice(body);
        r.extend_from_slice(&(compute_crc(body) as u32).to_be_bytes());
        r
    }

    #[test]
    fn rejects_before_publishing() {
        struct Untouched;

        impl FromRecords for Untouched {
            fn add_header(&mut self, _: &crate::sans::header::PacketHeader) {
                panic!("header published for a rejected packet");
            }
            fn add_record(&mut self) -> Option<&mut dyn FromRecord> {
                panic!("record published for a rejected packet");
            }
        }

        let mut r = seal(&[0x8E; 40]);
        r[0] = 1;

        let err = decode(&r, &mut Untouched).unwrap_err();
        assert!(matches!(err, Error::Health(e) if e.fault() == HealthFault::Preamble(0x01000000)));
    }

    #[test]
    fn corrupt_count_is_truncation() {
        // One record whose eight-byte group claims far more elements than
        // the packet holds.
        let mut body = Vec::from([0x8E, 0x01]);
        body.extend_from_slice(&[0; 28]);
        body.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0xFF, 0xFF]);
        body.extend_from_slice(&[0; 12]);

        let err = decode(&seal(&body), &mut Vec::<Skip>::new()).unwrap_err();
        assert!(matches!(err, Error::Truncated(_)));
    }

    #[test]
    fn skipped_records_are_still_consumed() {
        struct Skipping(usize);

        impl FromRecords for Skipping {
            fn add_record(&mut self) -> Option<&mut dyn FromRecord> {
                self.0 += 1;
                None
            }
        }

        let mut body = Vec::from([0x8E, 0x02]);
        for _ in 0..2 {
            body.extend_from_slice(&[0; 28]);
            body.extend_from_slice(&[0, 1, 0, 0xEF, 1]);
            body.extend_from_slice(&[0; 8]);
        }
        body.push(0x02);

        let mut o = Skipping(0);
        decode(&seal(&body), &mut o).unwrap();
        assert_eq!(o.0, 2);
    }

    #[test]
    fn variable_values_arrive_widened() {
        #[derive(Default)]
        struct Variables(Vec<(u16, u64, Vec<u8>)>);

        impl FromRecord for Variables {
            fn add_variable(&mut self, id: u16, value: u64, raw: &[u8]) {
                self.0.push((id, value, raw.to_vec()));
            }
        }

        let mut body = Vec::from([0x8E, 0x01]);
        body.extend_from_slice(&[0; 28]);
        body.extend_from_slice(&[0; 8]);
        body.extend_from_slice(&[0, 1, 0x01, 0x01, 0x00, 0x02, 0xAB, 0xCD]);
        body.push(0x01);

        let mut o = Vec::<Variables>::new();
        decode(&seal(&body), &mut o).unwrap();
        assert_eq!(o[0].0, [(257, 0xABCD, Vec::from([0xAB, 0xCD]))]);
    }

    #[test]
    fn unclaimed_bytes_before_trailer() {
        let mut body = Vec::from([0x8E, 0x01]);
        body.extend_from_slice(&[0; 38]);
        body.extend_from_slice(&[0xFF, 0xFF, 0x01]);

        let err = decode(&seal(&body), &mut Vec::<Skip>::new()).unwrap_err();
        assert!(matches!(err, Error::Unclaimed(2)));
    }

    #[derive(Default)]
    struct Skip;

    impl FromRecord for Skip {}
}
