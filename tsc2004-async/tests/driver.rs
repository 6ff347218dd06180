use std::collections::VecDeque;

use embassy_futures::block_on;
use embedded_hal_async::{
    delay::DelayNs,
    i2c::{ErrorKind, ErrorType, I2c, Operation},
};
use tsc2004_async::{Error, PressureMode, Register, TouchSample, TSC2004};

#[derive(Default)]
struct FakeChip {
    registers: [u16; 16],
    /// Values returned by successive status reads, before `registers` is used
    status: VecDeque<u16>,
    selected: usize,
    frames: Vec<Vec<u8>>,
    reads: usize,
    fail: bool,
}

impl FakeChip {
    fn with_sample(x: u16, y: u16, z1: u16, z2: u16) -> Self {
        let mut chip = Self::default();
        chip.registers[Register::X as usize] = x;
        chip.registers[Register::Y as usize] = y;
        chip.registers[Register::Z1 as usize] = z1;
        chip.registers[Register::Z2 as usize] = z2;
        chip.registers[Register::Status as usize] = 0x8000;
        chip
    }
}

impl ErrorType for FakeChip {
    type Error = ErrorKind;
}

impl I2c for FakeChip {
    async fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    self.frames.push(bytes.to_vec());
                    match *bytes {
                        [control] if control & 0x80 == 0 => {
                            self.selected = usize::from(control >> 3);
                        }
                        [control, high, low] => {
                            self.registers[usize::from(control >> 3)] =
                                u16::from_be_bytes([*high, *low]);
                        }
                        _ => {}
                    }
                }
                Operation::Read(buffer) => {
                    self.reads += 1;
                    let value = if self.selected == Register::Status as usize {
                        self.status
                            .pop_front()
                            .unwrap_or(self.registers[self.selected])
                    } else {
                        self.registers[self.selected]
                    };
                    buffer.copy_from_slice(&value.to_be_bytes());
                }
            }
        }

        Ok(())
    }
}

#[derive(Default)]
struct FakeDelay {
    waited_ns: u64,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waited_ns += u64::from(ns);
    }
}

#[test]
fn begin_writes_the_default_configuration() {
    let mut touch = TSC2004::new(FakeChip::default());
    let mut delay = FakeDelay::default();

    block_on(touch.begin(&mut delay)).unwrap();

    let chip = touch.release();
    assert_eq!(
        chip.frames,
        vec![
            vec![0x86],
            vec![0x62, 0xB3, 0x40],
            vec![0x6A, 0x00, 0x03],
            vec![0x72, 0x38, 0x1C],
            vec![0x84],
        ]
    );
    assert_eq!(delay.waited_ns, 10_000_000);
}

#[test]
fn sample_and_pressure_modes() {
    let mut touch = TSC2004::new(FakeChip::with_sample(100, 200, 50, 300));
    assert_eq!(touch.address(), tsc2004_async::DEFAULT_ADDR);
    assert_eq!(touch.pressure_mode(), PressureMode::Truncated);
    assert_eq!(
        block_on(touch.sample(1)).unwrap(),
        TouchSample::new(100, 200, 0)
    );

    touch.set_pressure_mode(PressureMode::Scaled);
    assert_eq!(
        block_on(touch.sample(1)).unwrap(),
        TouchSample::new(100, 200, 34)
    );
}

#[test]
fn rejected_reading_is_the_zero_sample() {
    let mut touch = TSC2004::new(FakeChip::with_sample(100, 200, 400, 300));

    assert_eq!(block_on(touch.sample(1)).unwrap(), TouchSample::ZERO);
    assert_eq!(block_on(touch.try_sample(1)).unwrap(), None);
}

#[test]
fn bounded_poll_times_out() {
    let mut chip = FakeChip::with_sample(100, 200, 50, 300);
    chip.registers[Register::Status as usize] = 0;
    let mut touch = TSC2004::new(chip);

    assert!(matches!(
        block_on(touch.sample(3)),
        Err(Error::NoDataAvailable)
    ));
    assert_eq!(touch.release().reads, 3);
}

#[test]
fn touched_reads_pen_mode_bit() {
    let mut touch = TSC2004::new(FakeChip::default());
    assert!(!block_on(touch.touched()).unwrap());
    assert!(block_on(touch.buffer_empty()).unwrap());

    block_on(touch.begin(&mut FakeDelay::default())).unwrap();
    assert!(block_on(touch.touched()).unwrap());
}

#[test]
fn bus_failure_is_propagated() {
    let chip = FakeChip {
        fail: true,
        ..FakeChip::default()
    };
    let mut touch = TSC2004::new(chip);

    assert!(matches!(
        block_on(touch.try_sample(1)),
        Err(Error::BusError(ErrorKind::Other))
    ));
}

#[test]
fn stop_sends_the_stop_command() {
    let mut touch = TSC2004::new(FakeChip::default());

    block_on(touch.stop()).unwrap();
    assert_eq!(touch.release().frames, vec![vec![0x85]]);
}

#[test]
fn poll_ends_after_one_read_when_data_is_ready() {
    for status in [0x8000, 0x4000, 0x2000, 0x1000] {
        let mut chip = FakeChip::with_sample(100, 200, 50, 300);
        chip.registers[Register::Status as usize] = status;
        let mut touch = TSC2004::new(chip);

        block_on(touch.wait_for_data(100)).unwrap();

        let chip = touch.release();
        assert_eq!(chip.reads, 1);
        assert_eq!(chip.frames, vec![vec![0x39]]);
    }
}

#[test]
fn blocking_sample_sleeps_between_empty_polls() {
    let mut chip = FakeChip::with_sample(100, 200, 50, 300);
    chip.status.extend([0x0000, 0x0000, 0x0000]);
    let mut touch = TSC2004::new(chip);
    let mut delay = FakeDelay::default();

    assert_eq!(
        block_on(touch.sample_blocking(&mut delay, 250)).unwrap(),
        TouchSample::new(100, 200, 0)
    );
    // three empty status reads, one ready, then X, Y, Z1 and Z2
    assert_eq!(touch.release().reads, 8);
    assert_eq!(delay.waited_ns, 3 * 250 * 1_000);
}

#[test]
fn blocking_wait_does_not_sleep_when_data_is_ready() {
    let mut touch = TSC2004::new(FakeChip::with_sample(100, 200, 50, 300));
    let mut delay = FakeDelay::default();

    block_on(touch.wait_for_data_blocking(&mut delay, 250)).unwrap();

    assert_eq!(touch.release().reads, 1);
    assert_eq!(delay.waited_ns, 0);
}
