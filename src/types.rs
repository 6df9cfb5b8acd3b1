//! This module defines types used by various traits.
//! These types are meant to be agnostic of the trait implementation.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

use bitfield_struct::bitfield;

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaLevel {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    High,
    /// 0 dBm
    Max,
}

#[cfg(feature = "defmt")]
impl defmt::Format for PaLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PaLevel::Min => defmt::write!(fmt, "-18 dBm"),
            PaLevel::Low => defmt::write!(fmt, "-12 dBm"),
            PaLevel::High => defmt::write!(fmt, "-6 dBm"),
            PaLevel::Max => defmt::write!(fmt, "0 dBm"),
        }
    }
}

impl PaLevel {
    pub(crate) const MASK: u8 = 6;

    /// Pick the level nearest to a gain given in dBm.
    ///
    /// The gain is clamped to the range [-18, 0] before it is
    /// mapped onto one of the four 6 dB steps (rounding toward 0 dBm).
    /// ```
    /// use nrf24l01::PaLevel;
    /// assert_eq!(PaLevel::from_dbm(-40), PaLevel::Min);
    /// assert_eq!(PaLevel::from_dbm(-7), PaLevel::High);
    /// assert_eq!(PaLevel::from_dbm(5), PaLevel::Max);
    /// ```
    pub const fn from_dbm(dbm: i8) -> Self {
        let clamped = if dbm < -18 {
            -18
        } else if dbm > 0 {
            0
        } else {
            dbm
        };
        match -clamped / 6 {
            0 => PaLevel::Max,
            1 => PaLevel::High,
            2 => PaLevel::Low,
            _ => PaLevel::Min,
        }
    }

    /// The nominal output power (in dBm) of this level.
    pub const fn dbm(self) -> i8 {
        match self {
            PaLevel::Min => -18,
            PaLevel::Low => -12,
            PaLevel::High => -6,
            PaLevel::Max => 0,
        }
    }

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 2,
            PaLevel::High => 4,
            PaLevel::Max => 6,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0 => PaLevel::Min,
            2 => PaLevel::Low,
            4 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{} dBm", self.dbm())
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataRate {
    /// represents 1 Mbps
    Mbps1,
    /// represents 2 Mbps
    Mbps2,
    /// represents 250 Kbps (nRF24L01+ only)
    Kbps250,
}

impl DataRate {
    pub(crate) const MASK: u8 = 0x28;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 0x8,
            DataRate::Kbps250 => 0x20,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0x8 => DataRate::Mbps2,
            0x20 => DataRate::Kbps250,
            _ => DataRate::Mbps1,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DataRate {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DataRate::Mbps1 => defmt::write!(fmt, "1 Mbps"),
            DataRate::Mbps2 => defmt::write!(fmt, "2 Mbps"),
            DataRate::Kbps250 => defmt::write!(fmt, "250 Kbps"),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DataRate::Mbps1 => write!(f, "1 Mbps"),
            DataRate::Mbps2 => write!(f, "2 Mbps"),
            DataRate::Kbps250 => write!(f, "250 Kbps"),
        }
    }
}

/// The logical operating state of the radio, as driven by this library.
///
/// | state | CONFIG.PWR_UP | CONFIG.PRIM_RX | CE |
/// |-------|:-------------:|:--------------:|:--:|
/// | [`RadioState::PowerDown`] | 0 | - | low |
/// | [`RadioState::Standby`] | 1 | - | low |
/// | [`RadioState::ActiveRx`] | 1 | 1 | high |
/// | [`RadioState::ActiveTx`] | 1 | 0 | high |
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RadioState {
    /// Registers are retained but the RF circuitry is off.
    PowerDown,
    /// Crystal oscillator running, CE inactive.
    Standby,
    /// Listening on all open pipes.
    ActiveRx,
    /// Transmitting whatever is in the TX FIFO.
    ActiveTx,
}

#[cfg(feature = "defmt")]
impl defmt::Format for RadioState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RadioState::PowerDown => defmt::write!(fmt, "PowerDown"),
            RadioState::Standby => defmt::write!(fmt, "Standby"),
            RadioState::ActiveRx => defmt::write!(fmt, "ActiveRx"),
            RadioState::ActiveTx => defmt::write!(fmt, "ActiveTx"),
        }
    }
}

impl Display for RadioState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            RadioState::PowerDown => write!(f, "PowerDown"),
            RadioState::Standby => write!(f, "Standby"),
            RadioState::ActiveRx => write!(f, "ActiveRx"),
            RadioState::ActiveTx => write!(f, "ActiveTx"),
        }
    }
}

/// The result of waiting on a transmission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TxOutcome {
    /// The payload was sent (and acknowledged, if auto-ack is enabled).
    Sent,
    /// The radio gave up after the configured number of retransmissions.
    MaxRetransmits,
    /// Neither event has occurred yet.
    Pending,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TxOutcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TxOutcome::Sent => defmt::write!(fmt, "Sent"),
            TxOutcome::MaxRetransmits => defmt::write!(fmt, "MaxRetransmits"),
            TxOutcome::Pending => defmt::write!(fmt, "Pending"),
        }
    }
}

impl Display for TxOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TxOutcome::Sent => write!(f, "Sent"),
            TxOutcome::MaxRetransmits => write!(f, "MaxRetransmits"),
            TxOutcome::Pending => write!(f, "Pending"),
        }
    }
}

/// An upper bound on a polling loop.
///
/// `attempts` counts the polls made *after* the first status check,
/// and `interval_us` is the delay (in microseconds) before each of those polls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollLimit {
    pub attempts: u32,
    pub interval_us: u32,
}

impl PollLimit {
    /// Poll up to `attempts` times with no delay between polls.
    pub const fn attempts(attempts: u32) -> Self {
        Self {
            attempts,
            interval_us: 0,
        }
    }

    /// Poll every `interval_us` microseconds until roughly `timeout_us` has elapsed.
    ///
    /// An `interval_us` of `0` cannot measure time, so `timeout_us` is then
    /// taken as a count: that many polls are made back to back with no delay.
    pub const fn timeout_us(timeout_us: u32, interval_us: u32) -> Self {
        let attempts = match timeout_us.checked_div(interval_us) {
            Some(whole) => whole + (timeout_us % interval_us != 0) as u32,
            None => timeout_us,
        };
        Self {
            attempts,
            interval_us,
        }
    }
}

impl Default for PollLimit {
    /// About 100 ms, polled every 100 microseconds.
    ///
    /// This covers the longest possible auto-retransmit cycle
    /// (15 retries with 4000 microseconds between each).
    fn default() -> Self {
        Self::timeout_us(100_000, 100)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PollLimit {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "PollLimit attempts: {}, interval_us: {}",
            self.attempts,
            self.interval_us
        )
    }
}

/// How [`EsbRadio::wait_for_tx_complete()`](fn@crate::radio::prelude::EsbRadio::wait_for_tx_complete)
/// should behave when the transmission has not finished yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaitMode {
    /// Report the current state and return immediately.
    NonBlocking,
    /// Keep polling the STATUS register within the given bounds.
    Blocking(PollLimit),
}

#[cfg(feature = "defmt")]
impl defmt::Format for WaitMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            WaitMode::NonBlocking => defmt::write!(fmt, "NonBlocking"),
            WaitMode::Blocking(limit) => defmt::write!(fmt, "Blocking({})", limit),
        }
    }
}

/// A struct used to describe the STATUS register.
///
/// The radio returns this byte as the first byte of every SPI transaction.
///
/// To instantiate an object with flags that have different values:
/// ```
/// use nrf24l01::StatusFlags;
/// let flags = StatusFlags::default() // all flags are false
///     .with_rx_dr(true); // assert only `rx_dr` flags
/// assert!(flags.rx_dr());
/// ```
/// Use [`StatusFlags::default`] to instantiate all flags set to false.
/// Use [`StatusFlags::new`] to instantiate all IRQ flags set to true.
#[bitfield(u8, new = false, order = Msb)]
#[derive(PartialEq, Eq)]
pub struct StatusFlags {
    #[bits(1)]
    _padding: u8,

    /// A flag to describe if RX Data Ready to read.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// A flag to describe if TX Data Sent.
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// A flag to describe if the maximum number of retransmissions was reached.
    #[bits(1, access = RO)]
    pub max_rt: bool,

    /// The pipe number of the payload at the top of the RX FIFO.
    ///
    /// A value of 7 means the RX FIFO is empty.
    #[bits(3, access = RO)]
    pub rx_pipe: u8,

    /// A flag to describe if the TX FIFO is full.
    #[bits(1, access = RO)]
    pub tx_full: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusFlags rx_dr: {}, tx_ds: {}, max_rt: {}, rx_pipe: {}, tx_full: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.max_rt(),
            self.rx_pipe(),
            self.tx_full()
        )
    }
}

impl StatusFlags {
    /// A mask to isolate only the IRQ flags. Useful for STATUS and CONFIG registers.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// The [`StatusFlags::rx_pipe`] value reported when the RX FIFO is empty.
    pub const RX_FIFO_EMPTY: u8 = 7;

    /// A convenience constructor similar to [`StatusFlags::default`] except
    /// all IRQ flags are set to `true`.
    pub fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }

    /// A flag to describe if RX Data Ready to read.
    pub fn with_rx_dr(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::RX_DR_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::RX_DR_OFFSET))
    }

    /// A flag to describe if TX Data Sent.
    pub fn with_tx_ds(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::TX_DS_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::TX_DS_OFFSET))
    }

    /// A flag to describe if the maximum number of retransmissions was reached.
    pub fn with_max_rt(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::MAX_RT_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::MAX_RT_OFFSET))
    }

    /// Decode the TX related events into a [`TxOutcome`].
    ///
    /// A `max_rt` event takes precedence over a `tx_ds` event.
    pub const fn tx_outcome(&self) -> TxOutcome {
        if self.max_rt() {
            TxOutcome::MaxRetransmits
        } else if self.tx_ds() {
            TxOutcome::Sent
        } else {
            TxOutcome::Pending
        }
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "StatusFlags rx_dr: {}, tx_ds: {}, max_rt: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.max_rt()
        )
    }
}

#[cfg(test)]
mod test {
    use super::{DataRate, PaLevel, PollLimit, RadioState, StatusFlags, TxOutcome};
    extern crate std;
    use std::{format, string::String};

    fn display_data_rate(param: DataRate, expected: String) -> bool {
        format!("{param}") == expected
    }

    #[test]
    fn data_rate_1mbps() {
        assert!(display_data_rate(DataRate::Mbps1, String::from("1 Mbps")));
    }

    #[test]
    fn data_rate_2mbps() {
        assert!(display_data_rate(DataRate::Mbps2, String::from("2 Mbps")));
    }

    #[test]
    fn data_rate_250kbps() {
        assert!(display_data_rate(
            DataRate::Kbps250,
            String::from("250 Kbps")
        ));
    }

    #[test]
    fn pa_level_display() {
        assert_eq!(format!("{}", PaLevel::Min), String::from("-18 dBm"));
        assert_eq!(format!("{}", PaLevel::Max), String::from("0 dBm"));
    }

    #[test]
    fn pa_level_from_dbm_clamps() {
        assert_eq!(PaLevel::from_dbm(i8::MIN), PaLevel::Min);
        assert_eq!(PaLevel::from_dbm(-18), PaLevel::Min);
        assert_eq!(PaLevel::from_dbm(-12), PaLevel::Low);
        assert_eq!(PaLevel::from_dbm(-11), PaLevel::High);
        assert_eq!(PaLevel::from_dbm(-6), PaLevel::High);
        assert_eq!(PaLevel::from_dbm(-1), PaLevel::Max);
        assert_eq!(PaLevel::from_dbm(0), PaLevel::Max);
        assert_eq!(PaLevel::from_dbm(i8::MAX), PaLevel::Max);
    }

    #[test]
    fn pa_level_bits() {
        for level in [PaLevel::Min, PaLevel::Low, PaLevel::High, PaLevel::Max] {
            assert_eq!(PaLevel::from_bits(level.into_bits() | 1), level);
        }
    }

    #[test]
    fn state_display() {
        assert_eq!(format!("{}", RadioState::ActiveRx), String::from("ActiveRx"));
        assert_eq!(format!("{}", TxOutcome::Pending), String::from("Pending"));
    }

    #[test]
    fn poll_limit_from_timeout() {
        let limit = PollLimit::timeout_us(1000, 300);
        assert_eq!(limit.attempts, 4);
        assert_eq!(limit.interval_us, 300);
        assert_eq!(PollLimit::timeout_us(900, 300).attempts, 3);
        assert_eq!(PollLimit::default().attempts, 1000);
    }

    #[test]
    fn poll_limit_without_interval() {
        // no delay between polls: the timeout is used as a poll count
        let limit = PollLimit::timeout_us(50, 0);
        assert_eq!(limit.attempts, 50);
        assert_eq!(limit.interval_us, 0);
        assert_eq!(limit, PollLimit::attempts(50));
    }

    #[test]
    fn display_flags() {
        assert_eq!(
            format!("{}", StatusFlags::default()),
            String::from("StatusFlags rx_dr: false, tx_ds: false, max_rt: false")
        );
    }

    fn set_flags(rx_dr: bool, tx_ds: bool, max_rt: bool) {
        let flags = StatusFlags::default()
            .with_rx_dr(rx_dr)
            .with_tx_ds(tx_ds)
            .with_max_rt(max_rt);
        assert_eq!(flags.rx_dr(), rx_dr);
        assert_eq!(flags.tx_ds(), tx_ds);
        assert_eq!(flags.max_rt(), max_rt);
    }

    #[test]
    fn flags_0x50() {
        set_flags(true, false, true);
    }

    #[test]
    fn flags_0x20() {
        set_flags(false, true, false);
    }

    #[test]
    fn status_byte_fields() {
        // RX_DR, pipe 3, TX FIFO full
        let flags = StatusFlags::from_bits(0x47);
        assert!(flags.rx_dr());
        assert_eq!(flags.rx_pipe(), 3);
        assert!(flags.tx_full());
        // reset value: RX FIFO empty
        let flags = StatusFlags::from_bits(0x0E);
        assert_eq!(flags.rx_pipe(), StatusFlags::RX_FIFO_EMPTY);
        assert!(!flags.tx_full());
    }

    #[test]
    fn tx_outcome_precedence() {
        assert_eq!(StatusFlags::from_bits(0x0E).tx_outcome(), TxOutcome::Pending);
        assert_eq!(StatusFlags::from_bits(0x2E).tx_outcome(), TxOutcome::Sent);
        assert_eq!(
            StatusFlags::from_bits(0x3E).tx_outcome(),
            TxOutcome::MaxRetransmits
        );
    }
}
