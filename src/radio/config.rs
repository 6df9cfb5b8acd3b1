use crate::radio::nrf24l01::bit_fields::{Config, Feature, RfSetup, SetupRetry};
use crate::{DataRate, PaLevel};

/// A struct to contain configuration about pipe addresses.
#[derive(Debug, Clone, Copy)]
struct PipeAddresses {
    tx_address: [u8; 5],
    pipe0: [u8; 5],
    pipe1: [u8; 5],
    /// The LSByte of pipes 2 - 5.
    pipes2_5: [u8; 4],
    rx_pipes_enabled: u8,
}

impl Default for PipeAddresses {
    fn default() -> Self {
        Self {
            tx_address: [0xC2; 5],
            pipe0: [0xE7; 5],
            pipe1: [0xC2; 5],
            pipes2_5: [0xC3, 0xC4, 0xC5, 0xC6],
            rx_pipes_enabled: 3,
        }
    }
}

impl PipeAddresses {
    fn set_rx_address(&mut self, pipe: u8, address: &[u8]) {
        let len = address.len().min(5);
        if len == 0 || pipe > 5 {
            return;
        }
        self.rx_pipes_enabled |= 1 << pipe;
        match pipe {
            0 => self.pipe0[..len].copy_from_slice(&address[..len]),
            1 => self.pipe1[..len].copy_from_slice(&address[..len]),
            _ => self.pipes2_5[pipe as usize - 2] = address[0],
        }
    }

    fn get_rx_address(&self, pipe: u8, address: &mut [u8]) {
        let len = address.len().min(5);
        match pipe {
            0 => address[..len].copy_from_slice(&self.pipe0[..len]),
            1 => address[..len].copy_from_slice(&self.pipe1[..len]),
            2..=5 if len > 0 => {
                address[0] = self.pipes2_5[pipe as usize - 2];
                address[1..len].copy_from_slice(&self.pipe1[1..len]);
            }
            _ => (),
        }
    }
}

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use nrf24l01::{radio::RadioConfig, DataRate};
/// let config = RadioConfig::default()
///     .with_channel(76)
///     .with_data_rate(DataRate::Kbps250);
/// assert_eq!(config.channel(), 76);
/// ```
///
/// The object is applied with
/// [`EsbInit::with_config()`](fn@crate::radio::prelude::EsbInit::with_config),
/// which rewrites every configuration register and leaves the radio powered down.
#[derive(Debug, Clone, Copy)]
pub struct RadioConfig {
    pub(crate) config_reg: Config,
    pub(crate) auto_retries: SetupRetry,
    pub(crate) rf_setup: RfSetup,
    pub(crate) feature: Feature,
    auto_ack: u8,
    address_width: u8,
    channel: u8,
    dynamic_payloads: u8,
    payload_lengths: [u8; 6],
    pipes: PipeAddresses,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with the radio's reset values.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `2` |
    /// | [`RadioConfig::address_width()`] | `5` |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::lna_enable()`] | `true` |
    /// | [`RadioConfig::crc_bytes()`] | `1` |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps2`] |
    /// | [`RadioConfig::payload_length()`] | `0` (for all pipes) |
    /// | [`RadioConfig::dynamic_payloads()`] | `0` (disabled for all pipes) |
    /// | [`RadioConfig::auto_ack()`] | `0x3F` (enabled for pipes 0 - 5) |
    /// | [`RadioConfig::ack_payloads()`] | `false` |
    /// | [`RadioConfig::no_ack_tx()`] | `false` |
    /// | [`RadioConfig::auto_retry_delay()`] | `250` |
    /// | [`RadioConfig::auto_retry_count()`] | `3` |
    /// | [`RadioConfig::tx_address()`] | `[0xC2; 5]` |
    /// | [`RadioConfig::rx_address()`] | See below table about [Default RX addresses](#default-rx-pipes-configuration) |
    /// | [`RadioConfig::rx_dr()`] | `true` |
    /// | [`RadioConfig::tx_ds()`] | `true` |
    /// | [`RadioConfig::max_rt()`] | `true` |
    ///
    /// ## Default RX pipes' configuration
    ///
    /// | pipe number | state  | address     |
    /// |-------------|--------|-------------|
    /// |      0      | open   | `[0xE7; 5]` |
    /// |      1      | open   | `[0xC2; 5]` |
    /// |      2[^1]  | closed | `0xC3`      |
    /// |      3[^1]  | closed | `0xC4`      |
    /// |      4[^1]  | closed | `0xC5`      |
    /// |      5[^1]  | closed | `0xC6`      |
    ///
    /// [^1]: Remember, pipes 2 - 5 share the same 4 LSBytes as the address on pipe 1.
    fn default() -> Self {
        Self {
            /*
               - all events enabled for IRQ pin
               - 8 bit CRC
               - powered down
               - primary RX
            */
            config_reg: Config::default(),
            /*
               - 250 us delay between attempts
               - 3 max attempts
            */
            auto_retries: SetupRetry::default(),
            /*
                - 2 Mbps data rate
                - Max PA level
                - LNA enabled
            */
            rf_setup: RfSetup::default(),
            feature: Feature::default(),
            auto_ack: 0x3F,
            address_width: 5,
            channel: 2,
            dynamic_payloads: 0,
            payload_lengths: [0; 6],
            pipes: PipeAddresses::default(),
        }
    }
}

impl RadioConfig {
    /// Returns the value set by [`RadioConfig::with_crc_bytes()`].
    pub const fn crc_bytes(&self) -> u8 {
        if !self.config_reg.en_crc() {
            0
        } else if self.config_reg.crco() {
            2
        } else {
            1
        }
    }

    /// The Cyclical Redundancy Checksum (CRC) length in bytes.
    ///
    /// `0` disables the CRC. Values above 2 are treated as 2.
    /// Note, the radio forces the CRC on while auto-ack is enabled for any pipe.
    pub fn with_crc_bytes(self, length: u8) -> Self {
        let new_config = self
            .config_reg
            .with_en_crc(length > 0)
            .with_crco(length > 1);
        Self {
            config_reg: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.rf_setup.data_rate()
    }

    /// The Data Rate (over the air).
    ///
    /// See [`EsbDataRate::set_data_rate()`](fn@crate::radio::prelude::EsbDataRate::set_data_rate).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_config = self.rf_setup.with_data_rate(data_rate);
        Self {
            rf_setup: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.rf_setup.pa_level()
    }

    /// The Power Amplitude (PA) level.
    ///
    /// See [`EsbPaLevel::set_pa_level()`](fn@crate::radio::prelude::EsbPaLevel::set_pa_level).
    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_config = self.rf_setup.with_pa_level(level);
        Self {
            rf_setup: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_lna_enable()`].
    pub const fn lna_enable(&self) -> bool {
        self.rf_setup.lna_hcurr()
    }

    /// Enable or disable the chip's Low Noise Amplifier (LNA) gain.
    pub fn with_lna_enable(self, enable: bool) -> Self {
        let new_config = self.rf_setup.with_lna_hcurr(enable);
        Self {
            rf_setup: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_address_width()`].
    pub const fn address_width(&self) -> u8 {
        self.address_width
    }

    /// The address width (in bytes) used by all pipes.
    ///
    /// This value is clamped to range [3, 5].
    pub fn with_address_width(self, value: u8) -> Self {
        Self {
            address_width: value.clamp(3, 5),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the channel (over the air frequency).
    ///
    /// This value is clamped to range [0, 127].
    /// The radio's frequency can be determined by the following equation:
    /// ```text
    /// frequency (in MHz) = channel + 2400
    /// ```
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value.min(127),
            ..self
        }
    }

    /// The auto-retry feature's delay in microseconds (set via [`RadioConfig::with_auto_retries()`])
    pub const fn auto_retry_delay(&self) -> u16 {
        self.auto_retries.delay_us()
    }

    /// The auto-retry feature's `count` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn auto_retry_count(&self) -> u8 {
        self.auto_retries.arc()
    }

    /// Set the auto-retry feature's `delay` (in microseconds) and `count` parameters.
    ///
    /// The `delay` is clamped to range [250, 4000] and truncated to a multiple of 250.
    /// The `count` is clamped to range [0, 15].
    pub fn with_auto_retries(self, delay: u16, count: u8) -> Self {
        let new_config = self
            .auto_retries
            .with_delay_us(delay.clamp(SetupRetry::MIN_DELAY_US, SetupRetry::MAX_DELAY_US))
            .with_arc(count.min(SetupRetry::MAX_COUNT));
        Self {
            auto_retries: new_config,
            ..self
        }
    }

    /// Get the value set by [`RadioConfig::with_rx_dr()`].
    pub const fn rx_dr(&self) -> bool {
        !self.config_reg.mask_rx_dr()
    }

    /// Enable or disable the "RX Data Ready" event triggering the radio's IRQ.
    ///
    /// See [`StatusFlags::rx_dr()`](fn@crate::StatusFlags::rx_dr).
    pub fn with_rx_dr(self, enable: bool) -> Self {
        let new_config = self.config_reg.with_mask_rx_dr(!enable);
        Self {
            config_reg: new_config,
            ..self
        }
    }

    /// Get the value set by [`RadioConfig::with_tx_ds()`].
    pub const fn tx_ds(&self) -> bool {
        !self.config_reg.mask_tx_ds()
    }

    /// Enable or disable the "TX Data Sent" event triggering the radio's IRQ.
    ///
    /// See [`StatusFlags::tx_ds()`](fn@crate::StatusFlags::tx_ds).
    pub fn with_tx_ds(self, enable: bool) -> Self {
        let new_config = self.config_reg.with_mask_tx_ds(!enable);
        Self {
            config_reg: new_config,
            ..self
        }
    }

    /// Get the value set by [`RadioConfig::with_max_rt()`].
    pub const fn max_rt(&self) -> bool {
        !self.config_reg.mask_max_rt()
    }

    /// Enable or disable the "max retransmits" event triggering the radio's IRQ.
    ///
    /// See [`StatusFlags::max_rt()`](fn@crate::StatusFlags::max_rt).
    pub fn with_max_rt(self, enable: bool) -> Self {
        let new_config = self.config_reg.with_mask_max_rt(!enable);
        Self {
            config_reg: new_config,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_auto_ack()`].
    pub const fn auto_ack(&self) -> u8 {
        self.auto_ack
    }

    /// Enable or disable auto-ACK feature.
    ///
    /// The given value (in binary form) is used to control the auto-ack feature for each pipe.
    /// Bit 0 controls the feature for pipe 0. Bit 1 controls the feature for pipe 1. And so on.
    /// Bits 6 and 7 are ignored.
    pub fn with_auto_ack(self, enable: u8) -> Self {
        Self {
            auto_ack: enable & 0x3F,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_dynamic_payloads()`].
    pub const fn dynamic_payloads(&self) -> u8 {
        self.dynamic_payloads
    }

    /// Enable or disable dynamically sized payloads per pipe.
    ///
    /// Like [`RadioConfig::with_auto_ack()`], each bit controls one pipe.
    /// Any enabled pipe also enables the feature in the FEATURE register.
    pub fn with_dynamic_payloads(self, enable: u8) -> Self {
        let enable = enable & 0x3F;
        let new_config = self.feature.with_dynamic_payloads(enable != 0);
        Self {
            dynamic_payloads: enable,
            feature: new_config,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_ack_payloads()`].
    pub const fn ack_payloads(&self) -> bool {
        self.feature.ack_payloads()
    }

    /// Enable or disable custom ACK payloads for auto-ACK packets.
    ///
    /// ACK payloads require auto-ack and dynamic payloads on pipe 0,
    /// and an auto-retry delay of at least 500 microseconds.
    /// If ACK payloads are enabled, then this function also applies those settings.
    pub fn with_ack_payloads(self, enable: bool) -> Self {
        if !enable {
            return Self {
                feature: self.feature.with_ack_payloads(false),
                ..self
            };
        }
        let auto_retries = if self.auto_retries.ard() == 0 {
            self.auto_retries.with_ard(1)
        } else {
            self.auto_retries
        };
        let dynamic_payloads = self.dynamic_payloads | 1;
        Self {
            auto_ack: self.auto_ack | 1,
            auto_retries,
            dynamic_payloads,
            feature: self
                .feature
                .with_ack_payloads(true)
                .with_dynamic_payloads(true),
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_no_ack_tx()`].
    pub const fn no_ack_tx(&self) -> bool {
        self.feature.no_ack_tx()
    }

    /// Allow payloads to be sent without requesting an ACK packet.
    pub fn with_no_ack_tx(self, enable: bool) -> Self {
        let new_config = self.feature.with_no_ack_tx(enable);
        Self {
            feature: new_config,
            ..self
        }
    }

    /// Return the value set by [`RadioConfig::with_payload_length()`] for a `pipe`.
    ///
    /// Returns 0 for a `pipe` above 5.
    pub const fn payload_length(&self, pipe: u8) -> u8 {
        if pipe > 5 {
            return 0;
        }
        self.payload_lengths[pipe as usize]
    }

    /// The payload length (clamped to 32) for statically sized payloads on a `pipe`.
    ///
    /// This does nothing if the given `pipe` is greater than 5.
    pub fn with_payload_length(self, pipe: u8, value: u8) -> Self {
        let mut payload_lengths = self.payload_lengths;
        if pipe < 6 {
            payload_lengths[pipe as usize] = value.min(32);
        }
        Self {
            payload_lengths,
            ..self
        }
    }

    /// Close a RX pipe from receiving data.
    ///
    /// Pipes 0 and 1 are open after [`RadioConfig::default()`].
    pub fn close_rx_pipe(self, pipe: u8) -> Self {
        let mut pipes = self.pipes;
        if pipe < 6 {
            pipes.rx_pipes_enabled &= !(1 << pipe);
        }
        Self { pipes, ..self }
    }

    /// Is a specified RX pipe open (`true`) or closed (`false`)?
    pub const fn is_rx_pipe_enabled(&self, pipe: u8) -> bool {
        pipe < 6 && self.pipes.rx_pipes_enabled & (1u8 << pipe) > 0
    }

    pub(crate) const fn rx_pipes_enabled(&self) -> u8 {
        self.pipes.rx_pipes_enabled
    }

    /// Get the address for a specified `pipe` set by [`RadioConfig::with_rx_address()`]
    ///
    /// For pipes 2 - 5, the 4 LSBytes are copied from pipe 1's address.
    pub fn rx_address(&self, pipe: u8, address: &mut [u8]) {
        self.pipes.get_rx_address(pipe, address);
    }

    /// Set the address of a specified RX `pipe` and open it for receiving data.
    ///
    /// This does nothing if the given `pipe` is greater than `5`.
    /// For pipes 2 - 5, only `address[0]` is used.
    ///
    /// See also [`RadioConfig::with_tx_address()`].
    pub fn with_rx_address(self, pipe: u8, address: &[u8]) -> Self {
        let mut pipes = self.pipes;
        pipes.set_rx_address(pipe, address);
        Self { pipes, ..self }
    }

    /// Get the address set by [`RadioConfig::with_tx_address()`]
    pub const fn tx_address(&self) -> [u8; 5] {
        self.pipes.tx_address
    }

    /// Set the TX address.
    pub fn with_tx_address(self, address: &[u8; 5]) -> Self {
        let mut pipes = self.pipes;
        pipes.tx_address = *address;
        Self { pipes, ..self }
    }
}

#[cfg(test)]
mod test {
    use super::RadioConfig;
    use crate::{DataRate, PaLevel};

    #[test]
    fn reset_image() {
        let config = RadioConfig::default();
        assert_eq!(config.config_reg.into_bits(), 0x09);
        assert_eq!(config.auto_retries.into_bits(), 0x03);
        assert_eq!(config.rf_setup.into_bits(), 0x0F);
        assert_eq!(config.feature.into_bits(), 0);
        assert_eq!(config.auto_ack(), 0x3F);
        assert_eq!(config.rx_pipes_enabled(), 0x03);
        assert_eq!(config.address_width(), 5);
        assert_eq!(config.channel(), 2);
        assert_eq!(config.tx_address(), [0xC2; 5]);
        assert_eq!(config.data_rate(), DataRate::Mbps2);
        assert_eq!(config.pa_level(), PaLevel::Max);
    }

    #[test]
    fn crc_bytes() {
        let mut config = RadioConfig::default();
        assert_eq!(config.crc_bytes(), 1);
        for len in 0..4 {
            config = config.with_crc_bytes(len);
            assert_eq!(config.crc_bytes(), len.min(2));
        }
    }

    #[test]
    fn config_irq_flags() {
        let mut config = RadioConfig::default();
        assert!(config.rx_dr());
        assert!(config.tx_ds());
        assert!(config.max_rt());
        config = config.with_rx_dr(false).with_tx_ds(false).with_max_rt(false);
        assert!(!config.rx_dr());
        assert!(!config.tx_ds());
        assert!(!config.max_rt());
        assert_eq!(config.config_reg.into_bits(), 0x79);
    }

    #[test]
    fn address_width() {
        let mut config = RadioConfig::default();
        for width in 0..10 {
            config = config.with_address_width(width);
            assert_eq!(config.address_width(), width.clamp(3, 5));
        }
    }

    #[test]
    fn rf_setup() {
        let mut config = RadioConfig::default();
        for level in [PaLevel::Max, PaLevel::High, PaLevel::Low, PaLevel::Min] {
            config = config.with_pa_level(level);
            assert_eq!(config.pa_level(), level);
        }
        for rate in [DataRate::Kbps250, DataRate::Mbps1, DataRate::Mbps2] {
            config = config.with_data_rate(rate);
            assert_eq!(config.data_rate(), rate);
        }
        assert!(config.lna_enable());
        config = config.with_lna_enable(false);
        assert!(!config.lna_enable());
    }

    #[test]
    fn channel() {
        let config = RadioConfig::default().with_channel(255);
        assert_eq!(config.channel(), 127);
    }

    #[test]
    fn auto_retries() {
        let mut config = RadioConfig::default();
        assert_eq!(config.auto_retry_count(), 3);
        assert_eq!(config.auto_retry_delay(), 250);
        config = config.with_auto_retries(5000, 20);
        assert_eq!(config.auto_retry_count(), 15);
        assert_eq!(config.auto_retry_delay(), 4000);
        config = config.with_auto_retries(0, 2);
        assert_eq!(config.auto_retry_delay(), 250);
        config = config.with_auto_retries(1100, 2);
        assert_eq!(config.auto_retry_delay(), 1000);
    }

    #[test]
    fn feature_register() {
        let mut config = RadioConfig::default().with_auto_ack(0);
        assert!(!config.ack_payloads());
        assert_eq!(config.dynamic_payloads(), 0);
        assert!(!config.no_ack_tx());

        config = config.with_ack_payloads(true);
        assert!(config.ack_payloads());
        assert_eq!(config.dynamic_payloads(), 1);
        assert!(config.feature.dynamic_payloads());
        assert_eq!(config.auto_ack(), 1);
        assert_eq!(config.auto_retry_delay(), 500);

        config = config.with_no_ack_tx(true).with_ack_payloads(false);
        assert!(!config.ack_payloads());
        assert_eq!(config.dynamic_payloads(), 1);
        assert!(config.no_ack_tx());

        config = config.with_dynamic_payloads(0);
        assert!(!config.feature.dynamic_payloads());
        config = config.with_dynamic_payloads(0xFF);
        assert_eq!(config.dynamic_payloads(), 0x3F);
    }

    #[test]
    fn payload_length() {
        let config = RadioConfig::default()
            .with_payload_length(0, 255)
            .with_payload_length(5, 8)
            .with_payload_length(6, 8);
        assert_eq!(config.payload_length(0), 32);
        assert_eq!(config.payload_length(5), 8);
        assert_eq!(config.payload_length(6), 0);
    }

    #[test]
    fn pipe_addresses() {
        let mut config = RadioConfig::default();
        let mut result = [0u8; 5];
        config.rx_address(0, &mut result);
        assert_eq!(result, [0xE7; 5]);
        config.rx_address(4, &mut result);
        assert_eq!(result, [0xC5, 0xC2, 0xC2, 0xC2, 0xC2]);

        config = config.close_rx_pipe(1).close_rx_pipe(10);
        assert!(!config.is_rx_pipe_enabled(1));
        // empty addresses are ignored
        config = config.with_rx_address(2, &[]);
        assert!(!config.is_rx_pipe_enabled(2));

        for pipe in 0..=6 {
            let address = [0xB0 + pipe; 5];
            config = config.with_rx_address(pipe, &address);
            config.rx_address(pipe, &mut result);
            if pipe < 2 {
                assert_eq!(address, result);
            } else if pipe < 6 {
                assert_eq!(address[0], result[0]);
                // LSBytes come from pipe 1
                assert_eq!(&result[1..], &[0xB1u8; 4]);
            }
            assert_eq!(config.is_rx_pipe_enabled(pipe), pipe < 6);
        }
        assert_eq!(config.rx_pipes_enabled(), 0x3F);

        config = config.with_tx_address(b"1Node");
        assert_eq!(&config.tx_address(), b"1Node");
    }
}
