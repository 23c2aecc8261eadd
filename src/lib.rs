#![no_std]
//! Bit-stuffed, HDLC-style framing over `embedded-io` byte channels.
//!
//! Each message travels as
//!
//! ```text
//! <0x7E> <payload bits, a 0 stuffed after every five 1s> <0x7E> <1s to a byte boundary>
//! ```
//!
//! Because stuffing caps payload runs of ones at five, the flag can only
//! appear on the wire as a delimiter, and the decoder finds it with a
//! sliding bit window regardless of byte alignment. Every call is
//! self-contained: no bit state is carried from one frame to the next.

pub mod bits;
mod decode;
mod encode;
mod error;
pub mod link;
pub mod serial;

#[cfg(test)]
mod testing;

/// Frame delimiter, 0111 1110. Never stuffed.
pub const FLAG: u8 = 0x7E;

/// Largest payload, in bytes, accepted by the encoder and produced by the
/// decoder.
pub const MAX_MESSAGE_LEN: usize = 256;

/// Consecutive payload ones after which a zero is stuffed.
pub(crate) const RUN_LIMIT: u8 = 5;

pub use decode::{FLAG_MARGIN_BITS, FRAME_BITS_MAX, FrameBits, PayloadBits, destuff, read_message};
pub use encode::{StuffedBits, WireBit, stuffed_bits, write_message};
pub use error::{ErrorKind, FrameError};
pub use link::{FrameRecv, FrameRx, FrameSend, FrameTx, FrameTxRx, Message};
pub use serial::{SerialChannel, SerialError};
