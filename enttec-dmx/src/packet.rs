use crate::{DMX_COMMAND_BYTE, MESSAGE_END, MESSAGE_START, METADATA_LENGTH, SEND_PACKET};

// Message format:
// - MESSAGE_START (0x7e)
// - Label: SEND_PACKET (6)
// - Data length: 2-byte little endian int, number of channel values that follow
// - DMX command byte, always 0 (the "start code" of the DMX frame)
// - N bytes of channel values
// - MESSAGE_END (0xe7)
// The data length counts the channel values only, not the DMX command byte.

/// Build a "Send DMX Packet" message carrying `payload` as channel values.
///
/// The caller is responsible for checking the payload size; this doesn't bound it.
/// Lengths above `u16::MAX` can't be described by the length field.
pub fn build_packet(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + METADATA_LENGTH);
    out.push(MESSAGE_START);
    out.push(SEND_PACKET);
    out.extend((payload.len() as u16).to_le_bytes());
    out.push(DMX_COMMAND_BYTE);
    out.extend_from_slice(payload);
    out.push(MESSAGE_END);
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{MAX_PAYLOAD_SIZE, MIN_PAYLOAD_SIZE};

    #[test]
    fn minimal_frame() {
        let payload = [0x10; 24];
        let packet = build_packet(&payload);
        let mut expected = vec![0x7e, 0x6, 24, 0x0, 0x0];
        expected.extend([0x10; 24]);
        expected.push(0xe7);
        assert_eq!(expected, packet);
    }

    #[test]
    fn incrementing_payload() {
        let payload: Vec<u8> = (0..300).map(|x| (x & 0xff) as u8).collect();
        let packet = build_packet(&payload);
        assert_eq!(packet.len(), 306);
        assert_eq!(packet[0], 0x7e);
        assert_eq!(packet[1], 0x06);
        assert_eq!(&packet[5..305], payload.as_slice());
        assert_eq!(packet[packet.len() - 1], 0xe7);
    }

    #[test]
    fn length_is_little_endian() {
        for (size, lsb, msb) in [(300, 44, 1), (200, 200, 0), (512, 0, 2), (256, 0, 1)] {
            let packet = build_packet(&vec![64; size]);
            assert_eq!(packet[2], lsb, "lsb for {size}");
            assert_eq!(packet[3], msb, "msb for {size}");
        }
    }

    #[test]
    fn every_valid_size() {
        for len in MIN_PAYLOAD_SIZE..=MAX_PAYLOAD_SIZE {
            let payload: Vec<u8> = (0..len).map(|x| (x * 7) as u8).collect();
            let packet = build_packet(&payload);
            assert_eq!(packet.len(), len + METADATA_LENGTH);
            assert_eq!(&packet[..2], &[MESSAGE_START, SEND_PACKET]);
            assert_eq!(u16::from_le_bytes([packet[2], packet[3]]) as usize, len);
            assert_eq!(packet[4], DMX_COMMAND_BYTE);
            assert_eq!(&packet[5..5 + len], payload.as_slice());
            assert_eq!(packet[len + 5], MESSAGE_END);
        }
    }

    #[test]
    fn empty_payload_still_frames() {
        assert_eq!(build_packet(&[]), vec![0x7e, 0x6, 0x0, 0x0, 0x0, 0xe7]);
    }
}
