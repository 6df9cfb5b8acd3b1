use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use super::{bit_fields::Config, mnemonics, registers, Nrf24Error, NRF24L01};
use crate::{
    radio::prelude::{EsbFifo, EsbPipe, EsbPower, EsbRadio, EsbStatus},
    PollLimit, RadioState, StatusFlags, TxOutcome, WaitMode,
};

impl<SPI, DO, DELAY> NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn config_reg(&mut self) -> Result<Config, Nrf24Error<SPI::Error, DO::Error>> {
        Ok(Config::from_bits(self.read_register(registers::CONFIG)?))
    }

    /// Drop CE so the radio passes through standby before PRIM_RX changes.
    fn leave_active_mode(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if matches!(self._state, RadioState::ActiveRx | RadioState::ActiveTx) {
            self.ce_low()?;
            self.set_state(RadioState::Standby);
        }
        Ok(())
    }

    /// Wait `limit.interval_us` before the next poll.
    ///
    /// Returns [`Nrf24Error::Timeout`] once `limit.attempts` polls were made.
    fn next_poll(
        &mut self,
        attempts: &mut u32,
        limit: &PollLimit,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if *attempts >= limit.attempts {
            #[cfg(feature = "defmt")]
            defmt::warn!("gave up polling after {} attempts", limit.attempts);
            return Err(Nrf24Error::Timeout);
        }
        *attempts += 1;
        if limit.interval_us > 0 {
            self._delay_impl.delay_us(limit.interval_us);
        }
        Ok(())
    }
}

impl<SPI, DO, DELAY> EsbRadio for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type RadioErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn enable_rx_mode(&mut self) -> Result<(), Self::RadioErrorType> {
        self.leave_active_mode()?;
        self.power_up()?;
        self.clear_status_flags(StatusFlags::default().with_rx_dr(true))?;
        let config = self.config_reg()?.as_rx();
        self.write_register(registers::CONFIG, config.into_bits())?;
        self.ce_high()?;
        self.set_state(RadioState::ActiveRx);
        Ok(())
    }

    fn disable_rx_mode(&mut self) -> Result<(), Self::RadioErrorType> {
        self.ce_low()?;
        self.set_state(RadioState::Standby);
        Ok(())
    }

    fn enable_tx_mode(&mut self) -> Result<(), Self::RadioErrorType> {
        self.leave_active_mode()?;
        self.power_up()?;
        self.clear_status_flags(StatusFlags::default().with_tx_ds(true).with_max_rt(true))?;
        let config = self.config_reg()?.as_tx();
        self.write_register(registers::CONFIG, config.into_bits())?;
        self.ce_high()?;
        self.set_state(RadioState::ActiveTx);
        Ok(())
    }

    fn disable_tx_mode(&mut self) -> Result<(), Self::RadioErrorType> {
        self.ce_low()?;
        self.clear_status_flags(StatusFlags::default().with_tx_ds(true).with_max_rt(true))?;
        self.set_state(RadioState::Standby);
        Ok(())
    }

    fn wait_for_tx_complete(&mut self, mode: WaitMode) -> Result<TxOutcome, Self::RadioErrorType> {
        let mut outcome = self.update()?.tx_outcome();
        if let WaitMode::Blocking(limit) = mode {
            let mut attempts = 0;
            while outcome == TxOutcome::Pending {
                self.next_poll(&mut attempts, &limit)?;
                outcome = self.update()?.tx_outcome();
            }
        }
        Ok(outcome)
    }

    /// Returns [`TxOutcome::Sent`] or [`TxOutcome::MaxRetransmits`].
    ///
    /// If the wait times out, the radio is still powered down
    /// before [`Nrf24Error::Timeout`] is returned.
    fn attempt_tx(&mut self, limit: PollLimit) -> Result<TxOutcome, Self::RadioErrorType> {
        self.enable_tx_mode()?;
        let result = self.wait_for_tx_complete(WaitMode::Blocking(limit));
        self.disable_tx_mode()?;
        self.power_down()?;
        result
    }

    fn submit_data(&mut self, data: &[u8]) -> Result<(), Self::RadioErrorType> {
        let en_aa = self.read_register(registers::EN_AA)?;
        if en_aa & mnemonics::ENAA_P0 > 0 {
            let mut address = [0u8; 5];
            self.read_register_multi(registers::TX_ADDR, &mut address)?;
            self.set_rx_address(0, &address)?;
        }
        self.set_tx_payload(data)
    }

    fn send_data(
        &mut self,
        data: &[u8],
        limit: PollLimit,
    ) -> Result<TxOutcome, Self::RadioErrorType> {
        self.submit_data(data)?;
        self.attempt_tx(limit)
    }

    fn send_data_to(
        &mut self,
        address: &[u8; 5],
        data: &[u8],
        limit: PollLimit,
    ) -> Result<TxOutcome, Self::RadioErrorType> {
        self.set_tx_address(address)?;
        self.send_data(data, limit)
    }

    /// The radio is returned to standby, even if the wait times out.
    fn wait_for_data_rx(&mut self, limit: PollLimit) -> Result<u8, Self::RadioErrorType> {
        self.enable_rx_mode()?;
        let mut attempts = 0;
        let result = loop {
            match self.available_pipe() {
                Ok(Some(pipe)) => break Ok(pipe),
                Ok(None) => {
                    if let Err(e) = self.next_poll(&mut attempts, &limit) {
                        break Err(e);
                    }
                }
                Err(e) => break Err(e),
            }
        };
        self.disable_rx_mode()?;
        result
    }

    /// If the radio reports a dynamic payload width above 32 bytes, the RX FIFO
    /// is flushed and [`Nrf24Error::BinaryCorruption`] is returned.
    fn read_data(&mut self, pipe: u8, buf: &mut [u8]) -> Result<Option<u8>, Self::RadioErrorType> {
        if pipe > 5 {
            return Err(Nrf24Error::InvalidArgument);
        }
        match self.available_pipe()? {
            None => return Ok(None),
            Some(available) if available != pipe => return Err(Nrf24Error::InvalidArgument),
            Some(_) => (),
        }
        if !self.is_data_ready_rx()? {
            return Ok(None);
        }
        let amount = match self.get_rx_data_amount(pipe) {
            Err(Nrf24Error::BinaryCorruption) => {
                // a corrupt width means the payload at the top of the RX FIFO is unusable
                self.flush_rx()?;
                return Err(Nrf24Error::BinaryCorruption);
            }
            amount => amount?,
        };
        if buf.len() < amount as usize {
            return Err(Nrf24Error::BufferTooSmall);
        }
        self.read_rx_payload(&mut buf[..amount as usize])?;
        self.clear_status_flags(StatusFlags::default().with_rx_dr(true))?;
        Ok(Some(amount))
    }
}
