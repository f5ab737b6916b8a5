//! Simulated SCH1 sensor behind the `Sch1Driver` trait

use sch1_streamer::sch1::chip::Reg;
use sch1_streamer::sch1::driver::Sch1Driver;
use sch1_streamer::sch1::frame::Frame;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Error returned when a bus failure is injected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

const DATA_MASK: u32 = 0xF_FFFF;
const RW_BIT: u64 = 1 << 37;
/// one of the four response error flags
const RESPONSE_ERROR: u64 = 0b0010 << 33;
const BLANK: u64 = 0xFFFF_FFFF_FFFF;
const STATUS_RANGE: std::ops::RangeInclusive<u8> = 0x14..=0x1D;

/// Shared state for the mock sensor (uses interior mutability)
#[derive(Debug, Default)]
struct MockState {
    /// 20 bit register contents by address
    registers: HashMap<u8, u32>,

    /// answer to the previous request, shifted out with the next transaction
    pending: Option<Frame>,

    /// every request seen on the bus
    requests: Vec<Frame>,

    /// EXTRESN pulses
    hardware_resets: usize,
    soft_resets: usize,

    /// status register value per init attempt, `status` after that
    status_by_attempt: Vec<u16>,
    status: u16,

    /// Failure injection flags
    fail_next_transaction: bool,
    respond_blank: bool,
    wrong_address: bool,
    /// registers that ignore writes
    read_only: HashSet<u8>,
    /// registers answering with an error flag
    error_flags: HashSet<u8>,
}

impl MockState {
    fn status_value(&self) -> u16 {
        let attempt = self.hardware_resets.saturating_sub(1);
        self.status_by_attempt.get(attempt).copied().unwrap_or(self.status)
    }

    fn power_up(&mut self) {
        self.registers.retain(|addr, _| !is_config_register(*addr));
        self.pending = None;
    }

    /// executes `request` and prepares the answer for the next transaction
    fn execute(&mut self, request: Frame) -> Frame {
        let addr = request.target_address() as u8;

        if request.0 & RW_BIT != 0 {
            if addr == Reg::CTRL_RESET.addr() && request.data() == 0x0A {
                self.soft_resets += 1;
                self.power_up();
                return Frame(0);
            }
            if !self.read_only.contains(&addr) {
                self.registers.insert(addr, request.data() & DATA_MASK);
            }
        }

        let data = if STATUS_RANGE.contains(&addr) {
            self.status_value() as u32
        } else {
            self.registers.get(&addr).copied().unwrap_or(0)
        };

        if self.respond_blank {
            return Frame(BLANK);
        }

        let source = if self.wrong_address { addr ^ 0x01 } else { addr };
        let mut raw = ((source as u64) << 37) | ((data as u64) << 8);
        if self.error_flags.contains(&addr) {
            raw |= RESPONSE_ERROR;
        }
        Frame(raw).with_crc()
    }
}

fn is_config_register(addr: u8) -> bool {
    (0x25..=0x36).contains(&addr)
}

/// Mock SCH1 with the one frame response delay of the real part.
///
/// Clones share their state, keep one to inspect the bus traffic.
#[derive(Debug, Clone, Default)]
pub struct MockSch1 {
    state: Rc<RefCell<MockState>>,
}

impl MockSch1 {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.state.borrow_mut().status = 0xFFFF;
        mock
    }

    /// Set a channel output, sign extended from 20 bits on read
    pub fn set_channel(&self, reg: Reg, value: i32) {
        self.set_register(reg, value as u32 & DATA_MASK);
    }

    pub fn set_register(&self, reg: Reg, value: u32) {
        self.state.borrow_mut().registers.insert(reg.addr(), value & DATA_MASK);
    }

    pub fn register(&self, reg: Reg) -> u32 {
        self.state.borrow().registers.get(&reg.addr()).copied().unwrap_or(0)
    }

    /// Temperature in °C, stored the way the sensor reports it
    pub fn set_temperature(&self, celsius: f32) {
        let raw = (celsius * 100.0) as i32;
        self.set_channel(Reg::TEMP, raw << 4);
    }

    pub fn set_status(&self, value: u16) {
        self.state.borrow_mut().status = value;
    }

    pub fn set_status_by_attempt(&self, values: &[u16]) {
        self.state.borrow_mut().status_by_attempt = values.to_vec();
    }

    pub fn fail_next_transaction(&self) {
        self.state.borrow_mut().fail_next_transaction = true;
    }

    pub fn respond_blank(&self, blank: bool) {
        self.state.borrow_mut().respond_blank = blank;
    }

    pub fn wrong_address(&self, wrong: bool) {
        self.state.borrow_mut().wrong_address = wrong;
    }

    pub fn make_read_only(&self, reg: Reg) {
        self.state.borrow_mut().read_only.insert(reg.addr());
    }

    pub fn set_error_flag(&self, reg: Reg, error: bool) {
        let mut state = self.state.borrow_mut();
        if error {
            state.error_flags.insert(reg.addr());
        } else {
            state.error_flags.remove(&reg.addr());
        }
    }

    pub fn requests(&self) -> Vec<Frame> {
        self.state.borrow().requests.clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn clear_requests(&self) {
        self.state.borrow_mut().requests.clear();
    }

    pub fn hardware_resets(&self) -> usize {
        self.state.borrow().hardware_resets
    }

    pub fn soft_resets(&self) -> usize {
        self.state.borrow().soft_resets
    }
}

impl Sch1Driver for MockSch1 {
    type Error = MockBusError;

    async fn transaction(&mut self, request: Frame) -> Result<Frame, MockBusError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request);

        if state.fail_next_transaction {
            state.fail_next_transaction = false;
            return Err(MockBusError);
        }

        let response = state.pending.take().unwrap_or(Frame(0));
        let next = state.execute(request);
        state.pending = Some(next);
        Ok(response)
    }

    async fn hardware_reset(&mut self) -> Result<(), MockBusError> {
        let mut state = self.state.borrow_mut();
        state.hardware_resets += 1;
        state.power_up();
        Ok(())
    }
}
