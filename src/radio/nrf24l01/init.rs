use super::{bit_fields::Feature, registers, Nrf24Error, NRF24L01};
use crate::{
    radio::{
        prelude::{EsbFifo, EsbInit, EsbPipe, EsbStatus},
        RadioConfig,
    },
    RadioState, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

impl<SPI, DO, DELAY> EsbInit for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ConfigErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Initialize the radio's hardware using the [`SpiBus`] and [`OutputPin`]s given
    /// to [`NRF24L01::new()`].
    ///
    /// Both FIFOs are flushed and every register is reset to the values
    /// described in [`RadioConfig::default()`]. The radio is left powered down.
    fn init(&mut self) -> Result<(), Self::ConfigErrorType> {
        self.ce_low()?;
        self._csn_pin.set_high().map_err(Nrf24Error::Gpo)?;
        // Allow the radio time to settle after a reset.
        self._delay_impl.delay_ms(5);

        self.flush_tx()?;
        self.flush_rx()?;
        self.with_config(&RadioConfig::default())
    }

    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType> {
        self.ce_low()?;
        self.write_register(
            registers::CONFIG,
            config.config_reg.with_pwr_up(false).into_bits(),
        )?;
        self.set_state(RadioState::PowerDown);

        self.write_register(registers::EN_AA, config.auto_ack())?;
        self.write_register(registers::EN_RXADDR, config.rx_pipes_enabled())?;
        self.set_address_width(config.address_width())?;
        self.write_register(registers::SETUP_RETR, config.auto_retries.into_bits())?;
        self.write_register(registers::RF_CH, config.channel())?;
        self.write_register(registers::RF_SETUP, config.rf_setup.into_bits())?;
        self.clear_status_flags(StatusFlags::new())?;
        self.write_register(registers::CD, 0)?;

        let mut address = [0; 5];
        for pipe in 0..6 {
            config.rx_address(pipe, &mut address);
            self.set_rx_address(pipe, &address)?;
        }
        self.set_tx_address(&config.tx_address())?;
        for pipe in 0..6 {
            self.set_rx_packet_size(pipe, config.payload_length(pipe))?;
        }

        let feature = config.feature.into_bits() & Feature::REG_MASK;
        if feature != 0 || config.dynamic_payloads() != 0 {
            self.activate_features()?;
        }
        self.write_register(registers::DYNPD, config.dynamic_payloads())?;
        self.write_register(registers::FEATURE, feature)?;
        self._feature =
            Feature::from_bits(self._feature.into_bits() & !Feature::REG_MASK | feature);
        Ok(())
    }
}
