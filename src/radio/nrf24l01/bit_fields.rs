use bitfield_struct::bitfield;

use crate::{DataRate, PaLevel};

use super::mnemonics;

/// The CONFIG register.
///
/// Defaults to the register's reset image used by
/// [`RadioConfig::default()`](fn@crate::radio::RadioConfig::default):
/// CRC enabled (1 byte), powered down, primary RX.
#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    /// Mask the "RX Data Ready" event from the IRQ pin.
    pub mask_rx_dr: bool,

    /// Mask the "TX Data Sent" event from the IRQ pin.
    pub mask_tx_ds: bool,

    /// Mask the "max retransmits" event from the IRQ pin.
    pub mask_max_rt: bool,

    #[bits(1, default = true)]
    pub en_crc: bool,

    /// `true` selects a 2 byte CRC.
    pub crco: bool,

    pub pwr_up: bool,

    #[bits(1, default = true)]
    pub prim_rx: bool,
}

impl Config {
    pub fn as_rx(self) -> Self {
        Self::from_bits(self.into_bits() | mnemonics::PRIM_RX | mnemonics::PWR_UP)
    }

    pub fn as_tx(self) -> Self {
        Self::from_bits(self.into_bits() & !mnemonics::PRIM_RX)
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retransmit delay, in steps of 250 microseconds (offset by 250).
    #[bits(4)]
    pub ard: u8,

    /// The auto-retransmit count.
    #[bits(4, default = 3)]
    pub arc: u8,
}

impl SetupRetry {
    pub const MIN_DELAY_US: u16 = 250;
    pub const MAX_DELAY_US: u16 = 4000;
    pub const MAX_COUNT: u8 = 15;

    /// The delay between retransmissions in microseconds.
    pub const fn delay_us(&self) -> u16 {
        (self.ard() as u16 + 1) * Self::MIN_DELAY_US
    }

    /// Convert a delay (already validated to be in range) into the ARD field.
    ///
    /// Delays that are not a multiple of 250 are truncated to the previous step.
    pub fn with_delay_us(self, delay: u16) -> Self {
        self.with_ard((delay / Self::MIN_DELAY_US - 1) as u8)
    }
}

/// The RF_SETUP register.
///
/// Defaults to 2 Mbps, 0 dBm, LNA gain enabled.
#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetup {
    pub cont_wave: bool,

    #[bits(1)]
    _padding: u8,

    pub rf_dr_low: bool,

    pub pll_lock: bool,

    #[bits(1, default = true)]
    pub rf_dr_high: bool,

    #[bits(2, default = 3)]
    pub rf_pwr: u8,

    #[bits(1, default = true)]
    pub lna_hcurr: bool,
}

impl RfSetup {
    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits())
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_val = self.into_bits() & !DataRate::MASK;
        Self::from_bits(new_val | data_rate.into_bits())
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits())
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_val = self.into_bits() & !PaLevel::MASK;
        Self::from_bits(new_val | level.into_bits())
    }
}

/// The FIFO_STATUS register.
#[bitfield(u8, order = Msb)]
pub(crate) struct FifoStatus {
    #[bits(1)]
    _padding: u8,

    pub tx_reuse: bool,

    pub tx_full: bool,

    pub tx_empty: bool,

    #[bits(2)]
    _reserved: u8,

    pub rx_full: bool,

    pub rx_empty: bool,
}

/// Driver-side bookkeeping of the FEATURE register.
///
/// The 3 LSBits mirror the FEATURE register's layout.
#[bitfield(u8, order = Msb)]
pub(crate) struct Feature {
    #[bits(4)]
    _padding: u8,

    /// Has the ACTIVATE command unlocked the FEATURE register?
    pub activated: bool,

    pub dynamic_payloads: bool,

    pub ack_payloads: bool,

    pub no_ack_tx: bool,
}

impl Feature {
    pub const REG_MASK: u8 = 7;
}
