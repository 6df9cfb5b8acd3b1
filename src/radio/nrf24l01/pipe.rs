use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

use crate::radio::{prelude::EsbPipe, Nrf24Error, NRF24L01};

use super::registers;

impl<SPI, DO, DELAY> EsbPipe for NRF24L01<SPI, DO, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PipeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_tx_address(&mut self, address: &[u8; 5]) -> Result<(), Self::PipeErrorType> {
        self.write_register_multi(registers::TX_ADDR, address)
    }

    fn set_rx_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        match pipe {
            0 | 1 => {
                if address.len() < 5 {
                    return Err(Nrf24Error::InvalidArgument);
                }
                self.write_register_multi(registers::RX_ADDR_P0 + pipe, &address[..5])
            }
            2..=5 => match address.first() {
                Some(lsb) => self.write_register(registers::RX_ADDR_P0 + pipe, *lsb),
                None => Err(Nrf24Error::InvalidArgument),
            },
            _ => Err(Nrf24Error::InvalidArgument),
        }
    }

    fn set_rx_packet_size(&mut self, pipe: u8, size: u8) -> Result<(), Self::PipeErrorType> {
        if pipe > 5 || size as usize > Self::MAX_PAYLOAD_SIZE {
            return Err(Nrf24Error::InvalidArgument);
        }
        self.write_register(registers::RX_PW_P0 + pipe, size)
    }

    fn set_address_width(&mut self, width: u8) -> Result<(), Self::PipeErrorType> {
        if !(3..=5).contains(&width) {
            return Err(Nrf24Error::InvalidArgument);
        }
        self.write_register(registers::SETUP_AW, width - 2)
    }

    /// Returns [`Nrf24Error::BinaryCorruption`] if the SETUP_AW register holds
    /// the illegal value `0`.
    fn get_address_width(&mut self) -> Result<u8, Self::PipeErrorType> {
        match self.read_register(registers::SETUP_AW)? & 3 {
            0 => Err(Nrf24Error::BinaryCorruption),
            aw => Ok(aw + 2),
        }
    }
}
