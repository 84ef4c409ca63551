//! Internal finite-state machine for implementing decoders.
//!
//! This module is intended for applications that need fine control over
//! decoder internals. See [`crate::avec`] for implementations covering common
//! decoding patterns.
//!
//! # Architecture
//!
//! All states are represented by a non-copy token. Once enough bytes are
//! ready, transition to another state by calling the token's `advance` method.
//! This will return a successor state token, along with any extracted data.
//! Decoding moves strictly forward through a packet:
//!
//! 1. [`health::Packet`] checks the size, preamble, codec and checksum of the
//!    whole packet.
//! 2. [`header::Header`] reads the packet header.
//! 3. [`record::Record`] reads the fixed fields of each record, followed by
//!    its five IO element groups ([`io::Group`] for each fixed width, then
//!    [`io::VariableGroup`]).
//! 4. [`trailer::Trailer`] reads the trailing record count and checksum.
//!
//! Only the initial state, re-exported for convenience as [`Decoder`], can be
//! constructed.
//!
//! Some areas of the decoding process are not represented in the finite-state
//! machine and must be carefully written:
//!
//! - Reading bytes from the correct place in the packet. Every state consumes
//!   the bytes immediately following those of its predecessor.
//!
//! - Bounding reads against the end of the packet. Record and element counts
//!   come from the packet itself, and a corrupt count can describe more data
//!   than the packet holds.
//!
//! Implementers are recommended to begin by studying and modifying a decoder
//! from the [`crate::avec`] module.

pub mod check;
pub mod header;
pub mod health;
pub mod io;
pub mod record;
pub mod trailer;

/// Entrypoint to the finite-state machine.
pub type Decoder = health::Packet;
