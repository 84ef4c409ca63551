//! Packet health checks, applied before any structural decoding.

use thiserror::Error;

use super::{check::compute_crc, header::Header};

/// Smallest packet the protocol can carry: a header, one record and a trailer.
pub const MIN_PACKET_SIZE: usize = 45;

/// Codec identifier of Codec 8 Extended.
pub const CODEC_8_EXTENDED: u8 = 0x8E;

/// Offset of the codec identifier, where the checksummed region begins.
const CODEC_OFFSET: usize = 8;

/// Width of the trailing checksum field.
const CRC_SIZE: usize = 4;

/// The specific reason a packet failed its health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HealthFault {
    /// Shorter than [`MIN_PACKET_SIZE`].
    #[error("Packet of {0} bytes is smaller than the minimum of 45.")]
    PacketTooSmall(usize),
    /// Non-zero preamble.
    #[error("Preamble ({0:#010x}) is not zero.")]
    Preamble(u32),
    /// Codec identifier other than [`CODEC_8_EXTENDED`].
    #[error("Unsupported codec ({0:#04x}).")]
    UnsupportedCodec(u8),
    /// Calculated and found CRC values do not match.
    #[error("Calculated ({calculated:#06x}) and found ({found:#010x}) CRC values do not match.")]
    CrcMismatch { found: u32, calculated: u16 },
}

/// A packet failed its health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Packet failed its health check.")]
pub struct PacketHealthError(#[from] HealthFault);

impl PacketHealthError {
    /// The specific check which failed.
    pub fn fault(&self) -> HealthFault {
        self.0
    }
}

/// State token to check the health of a complete packet.
#[derive(Debug)]
pub struct Packet;

impl Packet {
    /// Transition to another state by checking the health of a complete
    /// packet.
    ///
    /// Checks run in order (size, preamble, codec, checksum) and stop at the
    /// first failure. The packet is not otherwise decoded.
    ///
    /// Returns a successor state token.
    pub fn advance(r: &[u8]) -> Result<Header, PacketHealthError> {
        if r.len() < MIN_PACKET_SIZE {
            Err(HealthFault::PacketTooSmall(r.len()))?;
        }

        let preamble = u32::from_be_bytes([r[0], r[1], r[2], r[3]]);
        if preamble != 0 {
            Err(HealthFault::Preamble(preamble))?;
        }

        let codec = r[CODEC_OFFSET];
        if codec != CODEC_8_EXTENDED {
            Err(HealthFault::UnsupportedCodec(codec))?;
        }

        let (body, crc) = r.split_at(r.len() - CRC_SIZE);
        let found = u32::from_be_bytes([crc[0], crc[1], crc[2], crc[3]]);
        let calculated = compute_crc(&body[CODEC_OFFSET..]);

        if found != calculated as u32 {
            Err(HealthFault::CrcMismatch { found, calculated })?;
        }

        Ok(Header(()))
    }
}
