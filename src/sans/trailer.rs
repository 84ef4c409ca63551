//! States processing the packet trailer.

/// Size of the trailing record count and checksum fields.
pub const TRAILER_SIZE: usize = 5;

/// State token to decode the packet trailer.
#[derive(Debug)]
pub struct Trailer(pub(super) ());

impl Trailer {
    /// Transition out of the finite-state machine by decoding the packet
    /// trailer.
    ///
    /// Returns the trailing record count (`numOfData2`) and the checksum
    /// field. Neither is checked here: the checksum was verified before
    /// decoding began, and the record count is left to the caller.
    pub fn advance(self, r: [u8; TRAILER_SIZE]) -> (u8, u32) {
        (r[0], u32::from_be_bytes([r[1], r[2], r[3], r[4]]))
    }
}
