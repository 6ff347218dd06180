//! Register map, control byte framing and configuration register images

use bondrewd::Bitfields;

/// Control byte flag: read the addressed register
const REG_READ: u8 = 0x01;
/// Control byte flag: write the addressed register (PND0)
const REG_PND0: u8 = 0x02;

/// Control byte flag: the byte is a command, not a register access
const CMD: u8 = 1 << 7;
/// Command flag: 12-bit conversions
const CMD_12BIT: u8 = 1 << 2;

/// Largest value a 12-bit conversion can produce
pub const MAX_12BIT: u16 = 0x0fff;

/// Registers of the TSC2004, addressed by a 4-bit index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    X = 0x0,
    Y = 0x1,
    Z1 = 0x2,
    Z2 = 0x3,
    Aux = 0x4,
    Temp1 = 0x5,
    Temp2 = 0x6,
    Status = 0x7,
    AuxHigh = 0x8,
    AuxLow = 0x9,
    TempHigh = 0xA,
    TempLow = 0xB,
    Cfr0 = 0xC,
    Cfr1 = 0xD,
    Cfr2 = 0xE,
    ConvFunc = 0xF,
}

impl Register {
    #[inline]
    fn address(self) -> u8 {
        (self as u8) << 3
    }

    /// Control byte which selects this register for reading
    pub fn read_control(self) -> u8 {
        self.address() | REG_READ
    }

    /// Complete frame writing `value` to this register
    pub fn write_frame(self, value: u16) -> [u8; 3] {
        let [high, low] = value.to_be_bytes();
        [self.address() | REG_PND0, high, low]
    }
}

/// Commands accepted by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Start continuous conversion
    Normal = 0b00,
    /// Stop converting
    Stop = 0b01,
    /// Software reset
    Reset = 0b10,
}

impl Command {
    /// The single byte sent on the bus for this command
    pub fn control_byte(self) -> u8 {
        CMD | CMD_12BIT | self as u8
    }
}

/// Decode a big-endian register word.
///
/// Anything shorter than two bytes decodes to `0`; callers must tolerate a
/// spurious zero. The drivers always read a full two-byte frame, so a short
/// transfer reaches them as [crate::Error::BusError] instead.
pub fn decode_word(frame: &[u8]) -> u16 {
    match frame {
        [high, low, ..] => u16::from_be_bytes([*high, *low]),
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Register images

/// Configuration register 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Bitfields)]
#[bondrewd(default_endianness = "be")]
pub(crate) struct Cfr0 {
    #[bondrewd(bit_length = 1)]
    pub pen_mode: u8,
    #[bondrewd(bit_length = 1)]
    pub status_mode: u8,
    #[bondrewd(bit_length = 1)]
    pub resolution: u8,
    #[bondrewd(bit_length = 2)]
    pub clock: u8,
    #[bondrewd(bit_length = 3)]
    pub stabilization: u8,
    #[bondrewd(bit_length = 3)]
    pub precharge: u8,
    #[bondrewd(bit_length = 5)]
    pub padding0: u8,
}

/// Configuration register 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Bitfields)]
#[bondrewd(default_endianness = "be")]
pub(crate) struct Cfr1 {
    #[bondrewd(bit_length = 13)]
    pub padding0: u16,
    #[bondrewd(bit_length = 3)]
    pub batch_delay: u8,
}

/// Configuration register 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Bitfields)]
#[bondrewd(default_endianness = "be")]
pub(crate) struct Cfr2 {
    #[bondrewd(bit_length = 2)]
    pub padding0: u8,
    #[bondrewd(bit_length = 2)]
    pub median: u8,
    #[bondrewd(bit_length = 2)]
    pub window: u8,
    #[bondrewd(bit_length = 5)]
    pub padding1: u8,
    #[bondrewd(bit_length = 1)]
    pub average_x: u8,
    #[bondrewd(bit_length = 1)]
    pub average_y: u8,
    #[bondrewd(bit_length = 1)]
    pub average_z: u8,
    #[bondrewd(bit_length = 2)]
    pub padding2: u8,
}

/// Status register; only the data-available flags are of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Bitfields)]
#[bondrewd(default_endianness = "be")]
pub(crate) struct Status {
    #[bondrewd(bit_length = 1)]
    pub dav_x: u8,
    #[bondrewd(bit_length = 1)]
    pub dav_y: u8,
    #[bondrewd(bit_length = 1)]
    pub dav_z1: u8,
    #[bondrewd(bit_length = 1)]
    pub dav_z2: u8,
    #[bondrewd(bit_length = 12)]
    pub padding0: u16,
}

/// Does a status word report a fresh conversion for any of X, Y, Z1 or Z2?
pub fn data_available(status: u16) -> bool {
    let status = Status::from_bytes(status.to_be_bytes());

    status.dav_x | status.dav_y | status.dav_z1 | status.dav_z2 != 0
}

/// Does a CFR0 word have the pen-detect mode bit set?
pub fn pen_mode(cfr0: u16) -> bool {
    Cfr0::from_bytes(cfr0.to_be_bytes()).pen_mode != 0
}
