use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use super::{bit_fields::FifoStatus, commands, registers, Nrf24Error, NRF24L01};
use crate::radio::prelude::{EsbFifo, EsbStatus};

impl<SPI, DO, DELAY> NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn fifo_status(&mut self) -> Result<FifoStatus, Nrf24Error<SPI::Error, DO::Error>> {
        Ok(FifoStatus::from_bits(
            self.read_register(registers::FIFO_STATUS)?,
        ))
    }

    /// Write a payload frame (1 to 32 bytes) unless the TX FIFO is full.
    fn write_payload(
        &mut self,
        command: u8,
        data: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if data.is_empty() || data.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(Nrf24Error::InvalidArgument);
        }
        if self.is_tx_fifo_full()? {
            #[cfg(feature = "defmt")]
            defmt::warn!("TX FIFO is full");
            return Err(Nrf24Error::TxFifoFull);
        }
        self.spi_write_buf(command, data)?;
        Ok(())
    }
}

impl<SPI, DO, DELAY> EsbFifo for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type FifoErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_RX)?;
        Ok(())
    }

    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_TX)?;
        Ok(())
    }

    fn is_data_ready_rx(&mut self) -> Result<bool, Self::FifoErrorType> {
        Ok(!self.fifo_status()?.rx_empty())
    }

    /// This refreshes the STATUS byte with a NOP command.
    fn available_pipe(&mut self) -> Result<Option<u8>, Self::FifoErrorType> {
        let status = self.update()?;
        let pipe = status.rx_pipe();
        if status.rx_dr() && pipe < 6 {
            Ok(Some(pipe))
        } else {
            Ok(None)
        }
    }

    fn is_tx_fifo_full(&mut self) -> Result<bool, Self::FifoErrorType> {
        Ok(self.fifo_status()?.tx_full())
    }

    fn is_tx_fifo_empty(&mut self) -> Result<bool, Self::FifoErrorType> {
        Ok(self.fifo_status()?.tx_empty())
    }

    fn get_rx_data_amount(&mut self, pipe: u8) -> Result<u8, Self::FifoErrorType> {
        if pipe > 5 {
            return Ok(0);
        }
        if self._feature.dynamic_payloads() {
            return self.get_ack_data_amount();
        }
        Ok(self.read_register(registers::RX_PW_P0 + pipe)? & 0x3F)
    }

    /// Returns [`Nrf24Error::TxFifoFull`] (without writing the payload)
    /// if the TX FIFO already holds 3 payloads.
    fn set_tx_payload(&mut self, data: &[u8]) -> Result<(), Self::FifoErrorType> {
        self.write_payload(commands::W_TX_PAYLOAD, data)
    }

    /// Returns [`Nrf24Error::TxFifoFull`] (without writing the payload)
    /// if the TX FIFO already holds 3 payloads.
    fn set_ack_payload(&mut self, pipe: u8, data: &[u8]) -> Result<(), Self::FifoErrorType> {
        if pipe > 5 {
            return Err(Nrf24Error::InvalidArgument);
        }
        self.write_payload(commands::W_ACK_PAYLOAD | pipe, data)
    }

    fn read_rx_payload(&mut self, buf: &mut [u8]) -> Result<(), Self::FifoErrorType> {
        self.send_recv_command(commands::R_RX_PAYLOAD, buf)?;
        Ok(())
    }

    /// Returns [`Nrf24Error::BinaryCorruption`] if the reported width exceeds
    /// 32 bytes. The RX FIFO should then be flushed.
    fn get_ack_data_amount(&mut self) -> Result<u8, Self::FifoErrorType> {
        self.spi_read(1, commands::R_RX_PL_WID)?;
        let width = self._buf[1];
        if width as usize > Self::MAX_PAYLOAD_SIZE {
            return Err(Nrf24Error::BinaryCorruption);
        }
        Ok(width)
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers, EsbFifo};
    use crate::radio::nrf24l01::bit_fields::Feature;
    use crate::radio::Nrf24Error;
    use crate::{spi_test_expects, test::mk_radio};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    pub fn flush() {
        let spi_expectations = spi_test_expects![
            (vec![commands::FLUSH_RX], vec![0xEu8]),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        radio.flush_rx().unwrap();
        radio.flush_tx().unwrap();
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn fifo_states() {
        let spi_expectations = spi_test_expects![
            (vec![registers::FIFO_STATUS, 0xFFu8], vec![0xEu8, 0x11u8]),
            (vec![registers::FIFO_STATUS, 0xFFu8], vec![0xEu8, 0x10u8]),
            (vec![registers::FIFO_STATUS, 0xFFu8], vec![0xEu8, 0x21u8]),
            (vec![registers::FIFO_STATUS, 0xFFu8], vec![0xEu8, 0x11u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        assert!(!radio.is_data_ready_rx().unwrap());
        assert!(radio.is_data_ready_rx().unwrap());
        assert!(radio.is_tx_fifo_full().unwrap());
        assert!(radio.is_tx_fifo_empty().unwrap());
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn available_pipe() {
        let spi_expectations = spi_test_expects![
            // RX_DR on pipe 2
            (vec![commands::NOP], vec![0x44u8]),
            // RX FIFO empty
            (vec![commands::NOP], vec![0x0Eu8]),
            // RX_DR flagged but the FIFO has since been emptied
            (vec![commands::NOP], vec![0x4Eu8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        assert_eq!(radio.available_pipe(), Ok(Some(2)));
        assert_eq!(radio.available_pipe(), Ok(None));
        assert_eq!(radio.available_pipe(), Ok(None));
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn rx_data_amount_out_of_range() {
        let mocks = mk_radio(&[], &[]);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        assert_eq!(radio.get_rx_data_amount(6), Ok(0));
        assert_eq!(radio.get_rx_data_amount(255), Ok(0));
        // out of range pipes are ignored even with dynamic payloads
        radio._feature = Feature::default().with_dynamic_payloads(true);
        assert_eq!(radio.get_rx_data_amount(6), Ok(0));
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn rx_data_amount_static() {
        let spi_expectations = spi_test_expects![(
            vec![registers::RX_PW_P0 + 3, 0xFFu8],
            vec![0xEu8, 0xC8u8],
        ),];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        // only the 6 LSBits hold the width
        assert_eq!(radio.get_rx_data_amount(3), Ok(8));
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn rx_data_amount_dynamic() {
        let spi_expectations = spi_test_expects![
            (vec![commands::R_RX_PL_WID, 0xFFu8], vec![0x40u8, 12u8]),
            (vec![commands::R_RX_PL_WID, 0xFFu8], vec![0x40u8, 4u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        radio._feature = Feature::default().with_dynamic_payloads(true);
        assert_eq!(radio.get_rx_data_amount(1), Ok(12));
        assert_eq!(radio.get_ack_data_amount(), Ok(4));
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn rx_data_amount_corrupt() {
        let spi_expectations = spi_test_expects![
            (vec![commands::R_RX_PL_WID, 0xFFu8], vec![0x42u8, 0xFFu8]),
            (vec![commands::R_RX_PL_WID, 0xFFu8], vec![0x42u8, 33u8]),
            (vec![commands::R_RX_PL_WID, 0xFFu8], vec![0x42u8, 32u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        radio._feature = Feature::default().with_dynamic_payloads(true);
        assert_eq!(
            radio.get_rx_data_amount(1),
            Err(Nrf24Error::BinaryCorruption)
        );
        assert_eq!(
            radio.get_ack_data_amount(),
            Err(Nrf24Error::BinaryCorruption)
        );
        assert_eq!(radio.get_ack_data_amount(), Ok(32));
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn set_tx_payload() {
        let payload = [0x55u8; 4];
        let mut expected = vec![commands::W_TX_PAYLOAD];
        expected.extend_from_slice(&payload);
        let spi_expectations = spi_test_expects![
            (vec![registers::FIFO_STATUS, 0xFFu8], vec![0xEu8, 0x11u8]),
            (expected, vec![0xEu8; 5]),
            // TX FIFO full
            (vec![registers::FIFO_STATUS, 0xFFu8], vec![0xFu8, 0x21u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        radio.set_tx_payload(&payload).unwrap();
        assert_eq!(radio.set_tx_payload(&payload), Err(Nrf24Error::TxFifoFull));
        // lengths are checked before talking to the radio
        assert_eq!(radio.set_tx_payload(&[]), Err(Nrf24Error::InvalidArgument));
        assert_eq!(
            radio.set_tx_payload(&[0u8; 33]),
            Err(Nrf24Error::InvalidArgument)
        );
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn set_ack_payload() {
        let spi_expectations = spi_test_expects![
            (vec![registers::FIFO_STATUS, 0xFFu8], vec![0xEu8, 0x11u8]),
            (
                vec![commands::W_ACK_PAYLOAD | 5, 1u8, 2u8],
                vec![0xEu8, 0u8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        radio.set_ack_payload(5, &[1, 2]).unwrap();
        assert_eq!(
            radio.set_ack_payload(6, &[1, 2]),
            Err(Nrf24Error::InvalidArgument)
        );
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }

    #[test]
    pub fn read_rx_payload() {
        let spi_expectations = spi_test_expects![(
            vec![commands::R_RX_PAYLOAD, 0xFFu8, 0xFFu8, 0xFFu8],
            vec![0x42u8, 0xAu8, 0xBu8, 0xCu8],
        ),];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin, mut csn_pin) = (mocks.0, mocks.1, mocks.2, mocks.3);
        let mut buf = [0u8; 3];
        radio.read_rx_payload(&mut buf).unwrap();
        assert_eq!(buf, [0xA, 0xB, 0xC]);
        spi.done();
        ce_pin.done();
        csn_pin.done();
    }
}
