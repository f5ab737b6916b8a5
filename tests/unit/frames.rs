//! Unit tests for the frame codec and CRC engine

use sch1_streamer::sch1::chip::Reg;
use sch1_streamer::sch1::crc::{crc3, crc8, verify_crc3, verify_crc8};
use sch1_streamer::sch1::frame::Frame;

#[test]
fn test_documented_read_requests() {
    let expected = [
        (Reg::RATE_X1, 0x0048_0000_00AC),
        (Reg::ACC_X1, 0x0108_0000_00F6),
        (Reg::TEMP, 0x0408_0000_00B1),
        (Reg::STAT_SUM, 0x0508_0000_001C),
        (Reg::SN_ID3, 0x0FC8_0000_00A4),
    ];
    for (reg, frame) in expected {
        assert_eq!(reg.read_request(), Frame(frame), "read request for {reg:?}");
    }
}

#[test]
fn test_soft_reset_request() {
    let request = Reg::CTRL_RESET.write_request(0x0A);
    assert_eq!(request.0, 0x0DA8_0000_0AC3);
    assert_eq!(crc8(0x0DA8_0000_0A00), 0xC3);
}

#[test]
fn test_every_single_bit_flip_is_detected() {
    let frames = [
        Reg::CTRL_RESET.write_request(0x0A),
        Reg::CTRL_RATE.write_request(0x2649),
        Reg::TEMP.read_request(),
        Frame((0x28u64 << 37) | (0x4_9249 << 8)).with_crc(),
    ];
    for frame in frames {
        assert!(verify_crc8(frame.0));
        for bit in 0..48 {
            let corrupted = frame.0 ^ (1 << bit);
            assert!(!verify_crc8(corrupted), "flip of bit {bit} in {:#014x} not detected", frame.0);
        }
    }
}

#[test]
fn test_crc3_covers_upper_bits() {
    let frame = 0x1234_5670u32;
    let framed = frame | crc3(frame) as u32;
    assert!(verify_crc3(framed));
    assert!(crc3(frame) < 8);
    for bit in 3..32 {
        assert!(!verify_crc3(framed ^ (1 << bit)), "flip of bit {bit} not detected");
    }
}

#[test]
fn test_response_fields() {
    let response = Frame((0x3Eu64 << 37) | (0x0ABCD << 8)).with_crc();
    assert_eq!(response.source_address(), 0x3E);
    assert_eq!(response.data(), 0x0ABCD);
    assert_eq!(response.data_u16(), 0xABCD);
    assert!(!response.has_error());
    assert!(response.crc_ok());
}
