//! Unit tests for the verified register access layer

use crate::common::{create_mock_chip, run, MockBusError};
use sch1_streamer::sch1::chip::{AccSensDec, ProtocolFault, RateSensDec, Reg, Sch1, Sch1Error};
use sch1_streamer::sch1::frame::Frame;

#[test]
fn test_set_filters_writes_then_reads_back_through_pipeline() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);

    run(chip.set_filters(30, 68, 0)).unwrap();

    assert_eq!(sensor.register(Reg::CTRL_FILT_RATE), 0b001_001_001);
    assert_eq!(sensor.register(Reg::CTRL_FILT_ACC12), 0);
    assert_eq!(sensor.register(Reg::CTRL_FILT_ACC3), 0x1FF);

    // three writes, three reads and the repeated last read clocking out its answer
    assert_eq!(
        sensor.requests(),
        vec![
            Reg::CTRL_FILT_RATE.write_request(0x049),
            Reg::CTRL_FILT_ACC12.write_request(0x000),
            Reg::CTRL_FILT_ACC3.write_request(0x1FF),
            Reg::CTRL_FILT_RATE.read_request(),
            Reg::CTRL_FILT_ACC12.read_request(),
            Reg::CTRL_FILT_ACC3.read_request(),
            Reg::CTRL_FILT_ACC3.read_request(),
        ]
    );
}

#[test]
fn test_invalid_parameters_cause_no_bus_activity() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);

    assert_eq!(run(chip.set_filters(31, 30, 30)), Err(Sch1Error::InvalidParameter));
    assert_eq!(run(chip.set_rate_sens_dec(1600, 1234, 32)), Err(Sch1Error::InvalidParameter));
    assert_eq!(run(chip.set_rate_sens_dec(1600, 1600, 5)), Err(Sch1Error::InvalidParameter));
    assert_eq!(run(chip.set_acc_sens_dec(3200, 3200, 100, 32)), Err(Sch1Error::InvalidParameter));
    assert_eq!(run(chip.set_dry(2, true)), Err(Sch1Error::InvalidParameter));
    assert_eq!(run(chip.set_dry(-2, false)), Err(Sch1Error::InvalidParameter));

    assert_eq!(sensor.transaction_count(), 0);
}

#[test]
fn test_rate_sens_dec_roundtrip() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);

    run(chip.set_rate_sens_dec(1600, 3200, 4)).unwrap();
    assert_eq!(sensor.register(Reg::CTRL_RATE), 0x2649);
    assert_eq!(sensor.transaction_count(), 3);

    let read = run(chip.get_rate_sens_dec()).unwrap();
    assert_eq!(
        read,
        RateSensDec {
            sens_rate1: 1600,
            sens_rate2: 3200,
            dec_rate2: 4
        }
    );
}

#[test]
fn test_acc_sens_dec_roundtrip() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);

    run(chip.set_acc_sens_dec(3200, 25600, 6400, 16)).unwrap();
    assert_eq!(sensor.register(Reg::CTRL_ACC3), 0b010);

    let read = run(chip.get_acc_sens_dec()).unwrap();
    assert_eq!(
        read,
        AccSensDec {
            sens_acc1: 3200,
            sens_acc2: 25600,
            sens_acc3: 6400,
            dec_acc2: 16
        }
    );
}

#[test]
fn test_data_mismatch_is_reported() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);
    sensor.make_read_only(Reg::CTRL_FILT_ACC3);

    let result = run(chip.set_filters(30, 30, 13));
    assert_eq!(
        result,
        Err(Sch1Error::Other(ProtocolFault::DataMismatch {
            written: 0b010_010_010,
            read: 0
        }))
    );
}

#[test]
fn test_address_mismatch_is_reported() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);
    sensor.wrong_address(true);

    let result = run(chip.set_rate_sens_dec(1600, 1600, 32));
    assert_eq!(
        result,
        Err(Sch1Error::Other(ProtocolFault::AddressMismatch {
            expected: 0x28,
            received: 0x29
        }))
    );
}

#[test]
fn test_blank_response_is_rejected() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);
    sensor.respond_blank(true);

    assert_eq!(
        run(chip.enable_measurement(true, false)),
        Err(Sch1Error::Other(ProtocolFault::BlankFrame))
    );
    assert_eq!(run(chip.get_rate_sens_dec()), Err(Sch1Error::Other(ProtocolFault::BlankFrame)));
}

#[test]
fn test_bus_error_propagates() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);
    sensor.fail_next_transaction();

    assert_eq!(run(chip.set_filters(30, 30, 30)), Err(Sch1Error::Bus(MockBusError)));
}

#[test]
fn test_enable_measurement_bits() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);

    run(chip.enable_measurement(true, false)).unwrap();
    assert_eq!(sensor.register(Reg::CTRL_MODE), 0x01);

    run(chip.enable_measurement(true, true)).unwrap();
    assert_eq!(sensor.register(Reg::CTRL_MODE), 0x03);
    assert!(sensor.requests().contains(&Frame(0x0D68_0000_038D)));
}

#[test]
fn test_set_dry_read_modify_write() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);
    sensor.set_register(Reg::CTRL_USER_IF, 0x0001);

    run(chip.set_dry(1, true)).unwrap();
    assert_eq!(sensor.register(Reg::CTRL_USER_IF), 0x0061);

    // -1 keeps the polarity bit
    run(chip.set_dry(-1, false)).unwrap();
    assert_eq!(sensor.register(Reg::CTRL_USER_IF), 0x0041);

    run(chip.set_dry(0, true)).unwrap();
    assert_eq!(sensor.register(Reg::CTRL_USER_IF), 0x0021);
}

#[test]
fn test_set_dry_does_not_patch_an_unverified_read() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);
    sensor.set_register(Reg::CTRL_USER_IF, 0x0001);
    sensor.respond_blank(true);

    assert_eq!(run(chip.set_dry(1, true)), Err(Sch1Error::Other(ProtocolFault::BlankFrame)));
    // the read and its flush, no write
    let read = Reg::CTRL_USER_IF.read_request();
    assert_eq!(sensor.requests(), vec![read, read]);
    assert_eq!(sensor.register(Reg::CTRL_USER_IF), 0x0001);

    sensor.respond_blank(false);
    sensor.wrong_address(true);
    sensor.clear_requests();
    assert_eq!(
        run(chip.set_dry(1, true)),
        Err(Sch1Error::Other(ProtocolFault::AddressMismatch {
            expected: Reg::CTRL_USER_IF.addr() as u16,
            received: (Reg::CTRL_USER_IF.addr() ^ 0x01) as u16
        }))
    );
    assert_eq!(sensor.requests(), vec![read, read]);
    assert_eq!(sensor.register(Reg::CTRL_USER_IF), 0x0001);
}

#[test]
fn test_read_status_order() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);

    let status = run(chip.read_status()).unwrap();
    assert!(status.is_ok());

    let requests = sensor.requests();
    assert_eq!(requests.len(), 11);
    assert_eq!(requests[0], Reg::STAT_SUM.read_request());
    assert_eq!(requests[9], Reg::STAT_ACC_Z.read_request());
    assert_eq!(requests[10], Reg::STAT_ACC_Z.read_request());

    sensor.set_status(0xFFFE);
    let status = run(chip.read_status()).unwrap();
    assert!(!status.is_ok());
    assert_eq!(status.acc_z, 0xFFFE);
}

#[test]
fn test_serial_number_and_component_id() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);
    sensor.set_register(Reg::SN_ID1, 0x00AB);
    sensor.set_register(Reg::SN_ID2, 1234);
    sensor.set_register(Reg::SN_ID3, 0x0C0F);
    sensor.set_register(Reg::COMP_ID, 0x0021);

    let serial = run(chip.serial_number()).unwrap();
    assert_eq!(serial.as_str(), "01234B0C0F");
    assert_eq!(run(chip.component_id()).unwrap(), 0x0021);
}

#[test]
fn test_soft_reset_clears_configuration() {
    let (mut driver, sensor) = create_mock_chip();
    let mut chip = Sch1::new(&mut driver);

    run(chip.set_rate_sens_dec(3200, 3200, 8)).unwrap();
    run(chip.soft_reset()).unwrap();

    assert_eq!(sensor.soft_resets(), 1);
    assert_eq!(sensor.register(Reg::CTRL_RATE), 0);
    assert_eq!(sensor.requests().last(), Some(&Frame(0x0DA8_0000_0AC3)));
}
