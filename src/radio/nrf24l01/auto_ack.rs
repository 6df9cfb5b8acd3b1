use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use super::{bit_fields::SetupRetry, commands, mnemonics, registers, Nrf24Error, NRF24L01};
use crate::{radio::prelude::EsbAutoAck, RadioState};

impl<SPI, DO, DELAY> NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// The FEATURE register may only be changed in power down or standby.
    fn check_feature_state(&self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        match self._state {
            RadioState::PowerDown | RadioState::Standby => Ok(()),
            _ => Err(Nrf24Error::InvalidState),
        }
    }

    /// Unlock the FEATURE and DYNPD registers (done only once per instance).
    pub(super) fn activate_features(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if !self._feature.activated() {
            self.spi_write_buf(commands::ACTIVATE, &[mnemonics::ACTIVATE_KEY])?;
            self._feature.set_activated(true);
        }
        Ok(())
    }

    fn set_feature_bit(&mut self, mask: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let feature = self.read_register(registers::FEATURE)?;
        if feature & mask == 0 {
            self.write_register(registers::FEATURE, feature | mask)?;
        }
        Ok(())
    }

    fn setup_retry(&mut self) -> Result<SetupRetry, Nrf24Error<SPI::Error, DO::Error>> {
        Ok(SetupRetry::from_bits(
            self.read_register(registers::SETUP_RETR)?,
        ))
    }
}

impl<SPI, DO, DELAY> EsbAutoAck for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type AutoAckErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_auto_retransmit_count(&mut self, count: u8) -> Result<(), Self::AutoAckErrorType> {
        if count > SetupRetry::MAX_COUNT {
            return Err(Nrf24Error::InvalidArgument);
        }
        let setup = self.setup_retry()?.with_arc(count);
        self.write_register(registers::SETUP_RETR, setup.into_bits())
    }

    fn set_auto_retransmit_delay(&mut self, delay: u16) -> Result<(), Self::AutoAckErrorType> {
        if !(SetupRetry::MIN_DELAY_US..=SetupRetry::MAX_DELAY_US).contains(&delay) {
            return Err(Nrf24Error::InvalidArgument);
        }
        let setup = self.setup_retry()?.with_delay_us(delay);
        self.write_register(registers::SETUP_RETR, setup.into_bits())
    }

    fn enable_dynamic_payloads(&mut self, pipe: u8) -> Result<(), Self::AutoAckErrorType> {
        self.check_feature_state()?;
        if pipe > 5 {
            return Err(Nrf24Error::InvalidArgument);
        }
        self.activate_features()?;
        self.set_feature_bit(mnemonics::EN_DPL)?;
        let dynpd = self.read_register(registers::DYNPD)?;
        if dynpd & (1 << pipe) == 0 {
            self.write_register(registers::DYNPD, dynpd | (1 << pipe))?;
        }
        self._feature.set_dynamic_payloads(true);
        Ok(())
    }

    /// The auto-retransmit delay is raised to 500 microseconds if it is shorter,
    /// so there is time to receive an ACK packet carrying a payload.
    fn enable_ack_payloads(&mut self) -> Result<(), Self::AutoAckErrorType> {
        self.check_feature_state()?;
        self.enable_dynamic_payloads(0)?;
        if self.setup_retry()?.ard() == 0 {
            self.set_auto_retransmit_delay(500)?;
        }
        let feature = self.read_register(registers::FEATURE)?;
        self.write_register(registers::FEATURE, feature | mnemonics::EN_ACK_PAY)?;
        self._feature.set_ack_payloads(true);
        Ok(())
    }

    /// Allows the use of [`commands::W_TX_PAYLOAD_NO_ACK`]
    /// (with [`NRF24L01::send_command()`]).
    fn enable_no_ack_tx(&mut self) -> Result<(), Self::AutoAckErrorType> {
        self.check_feature_state()?;
        self.activate_features()?;
        self.set_feature_bit(mnemonics::EN_DYN_ACK)?;
        self._feature.set_no_ack_tx(true);
        Ok(())
    }
}
