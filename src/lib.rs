#![no_std]

//! A validating decoder for Teltonika Codec 8 Extended AVL packets.
//!
//! Trackers report GPS fixes and telemetry as binary packets, each carrying
//! one or more AVL records. A packet is health-checked (size, preamble, codec
//! and CRC) before any of its structure is decoded, and decoding fails as a
//! whole rather than returning partial results.
//!
//! Most users should begin with [`decode`], or with the receiver traits and
//! derive macro in the [`avec`] module. If these prove insufficient, consider
//! implementing a decoder as described in the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader-based decoder (default).

extern crate alloc;

pub mod avec;
pub mod sans;

pub use avec::{
    decode,
    packet::{AvlRecord, DecodedPacket, IoElement},
};
pub use sans::{header::PacketHeader, record::GpsFix};
