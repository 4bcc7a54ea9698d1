//! Framing and transmission of DMX frames for the Enttec DMX USB Pro,
//! using the widget's "Send DMX Packet" request.

pub mod packet;
pub mod transport;
pub mod writer;

pub use packet::build_packet;
pub use transport::{Parity, PortSettings, StopBits, Transport, TransportError};
pub use writer::{DmxError, DmxWriter, WriterState};

const MESSAGE_START: u8 = 0x7e;
const MESSAGE_END: u8 = 0xe7;
const SEND_PACKET: u8 = 6;
const DMX_COMMAND_BYTE: u8 = 0;

/// Start, label, two length bytes, DMX command byte and end.
pub const METADATA_LENGTH: usize = 6;
pub const MIN_PAYLOAD_SIZE: usize = 24;
pub const MAX_PAYLOAD_SIZE: usize = 512;
pub const MAX_PACKET_SIZE: usize = MAX_PAYLOAD_SIZE + METADATA_LENGTH;

fn payload_size_ok(len: usize) -> bool {
    (MIN_PAYLOAD_SIZE..=MAX_PAYLOAD_SIZE).contains(&len)
}
