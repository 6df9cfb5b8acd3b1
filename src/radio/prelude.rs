//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use nrf24l01::radio::prelude::*;
//! ```

use crate::types::{DataRate, PaLevel, PollLimit, StatusFlags, TxOutcome, WaitMode};

use super::RadioConfig;

/// A trait to represent manipulation of data pipes
/// for an ESB capable transceiver.
pub trait EsbPipe {
    type PipeErrorType;

    /// Set the destination address used in TX mode.
    ///
    /// When auto-ack is enabled on pipe 0,
    /// [`EsbRadio::submit_data()`] copies this address to pipe 0 so the ACK can be received.
    fn set_tx_address(&mut self, address: &[u8; 5]) -> Result<(), Self::PipeErrorType>;

    /// Set the RX address of a `pipe`.
    ///
    /// ### About pipe addresses
    /// Pipes 0 and 1 store a full 5-byte address, so `address` must have
    /// at least 5 bytes (only the first 5 are used).
    /// Pipes 2-5 only store a single byte (`address[0]`),
    /// borrowing the 4 remaining bytes from pipe 1's address.
    ///
    /// A `pipe` above 5 or a too short `address` is an invalid argument.
    fn set_rx_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Set the static payload length (in range [0, 32]) of a `pipe`.
    ///
    /// A length of 0 means the pipe is unused.
    fn set_rx_packet_size(&mut self, pipe: u8, size: u8) -> Result<(), Self::PipeErrorType>;

    /// Set the address width (in range [3, 5]) applied to all pipes.
    fn set_address_width(&mut self, width: u8) -> Result<(), Self::PipeErrorType>;

    /// Get the address width applied to all pipes.
    fn get_address_width(&mut self) -> Result<u8, Self::PipeErrorType>;
}

/// A trait to represent manipulation of a channel (aka frequency)
/// for an ESB capable transceiver.
pub trait EsbChannel {
    type ChannelErrorType;

    /// Set the radio's currently selected channel.
    ///
    /// These channels translate to the RF frequency as an offset of MHz from 2400 MHz.
    /// The channel is a 7 bit value.
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType>;

    /// Get the radio's currently selected channel.
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType>;
}

/// A trait to represent manipulation of [`StatusFlags`]
/// for an ESB capable transceiver.
pub trait EsbStatus {
    type StatusErrorType;

    /// Get the [`StatusFlags`] state that was cached from the latest SPI transaction.
    fn get_status_flags(&self) -> StatusFlags;

    /// Clear the radio's IRQ status flags
    ///
    /// This needs to be done after the event has been handled.
    ///
    /// Set any member of [`StatusFlags`] to `true` to clear the corresponding
    /// event. Members set to `false` leave the corresponding flag untouched.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType>;

    /// Refresh the internal cache of status byte
    /// (which is also saved from every SPI transaction).
    fn update(&mut self) -> Result<StatusFlags, Self::StatusErrorType>;
}

/// A trait to represent manipulation of RX and TX FIFOs
/// for an ESB capable transceiver.
pub trait EsbFifo {
    type FifoErrorType;

    /// Flush the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Is there a payload in the RX FIFO?
    fn is_data_ready_rx(&mut self) -> Result<bool, Self::FifoErrorType>;

    /// Get the pipe number that received the payload at the top of the RX FIFO.
    ///
    /// Returns `None` if no RX Data Ready event is flagged.
    fn available_pipe(&mut self) -> Result<Option<u8>, Self::FifoErrorType>;

    /// Is the TX FIFO full?
    fn is_tx_fifo_full(&mut self) -> Result<bool, Self::FifoErrorType>;

    /// Is the TX FIFO empty?
    fn is_tx_fifo_empty(&mut self) -> Result<bool, Self::FifoErrorType>;

    /// Get the number of bytes available for a `pipe`.
    ///
    /// With static payloads, this is the `pipe`'s configured payload length.
    /// With dynamic payloads, this is the length of the payload at the top of the RX FIFO.
    ///
    /// Returns 0 (without talking to the radio) if `pipe` is not in range [0, 5].
    fn get_rx_data_amount(&mut self, pipe: u8) -> Result<u8, Self::FifoErrorType>;

    /// Put a payload (1 to 32 bytes) in the TX FIFO.
    fn set_tx_payload(&mut self, data: &[u8]) -> Result<(), Self::FifoErrorType>;

    /// Put a payload (1 to 32 bytes) in the TX FIFO, to be sent with
    /// the next ACK packet for the given `pipe`.
    fn set_ack_payload(&mut self, pipe: u8, data: &[u8]) -> Result<(), Self::FifoErrorType>;

    /// Read `buf.len()` bytes from the RX FIFO.
    ///
    /// No validation is done. The payload is removed from the RX FIFO once it is read.
    fn read_rx_payload(&mut self, buf: &mut [u8]) -> Result<(), Self::FifoErrorType>;

    /// Get the length of the (dynamic length) payload at the top of the RX FIFO.
    fn get_ack_data_amount(&mut self) -> Result<u8, Self::FifoErrorType>;
}

/// A trait to represent manipulation of the power state
/// for an ESB capable transceiver.
pub trait EsbPower {
    type PowerErrorType;

    /// Power down the radio (and deactivate the CE pin).
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Power up the radio into standby mode.
    fn power_up(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Is the radio powered up?
    fn is_powered(&self) -> bool;
}

/// A trait to represent manipulation of the automatic retransmission and
/// the features that depend on the FEATURE register
/// for an ESB capable transceiver.
pub trait EsbAutoAck {
    type AutoAckErrorType;

    /// Set the number of automatic retransmissions (in range [0, 15]).
    ///
    /// 0 disables automatic retransmission.
    fn set_auto_retransmit_count(&mut self, count: u8) -> Result<(), Self::AutoAckErrorType>;

    /// Set the delay (in microseconds, range [250, 4000]) between automatic retransmissions.
    ///
    /// A delay that is not a multiple of 250 is truncated to the previous multiple.
    fn set_auto_retransmit_delay(&mut self, delay: u16) -> Result<(), Self::AutoAckErrorType>;

    /// Enable dynamic payload lengths for a `pipe`.
    ///
    /// Only allowed while the radio is powered down or in standby.
    fn enable_dynamic_payloads(&mut self, pipe: u8) -> Result<(), Self::AutoAckErrorType>;

    /// Allow payloads to be attached to ACK packets.
    ///
    /// This enables dynamic payloads on pipe 0. Only allowed while the radio
    /// is powered down or in standby.
    fn enable_ack_payloads(&mut self) -> Result<(), Self::AutoAckErrorType>;

    /// Allow payloads to be sent without requesting an ACK.
    ///
    /// Only allowed while the radio is powered down or in standby.
    fn enable_no_ack_tx(&mut self) -> Result<(), Self::AutoAckErrorType>;
}

/// A trait to represent manipulation of data rate
/// for an ESB capable transceiver.
pub trait EsbDataRate {
    type DataRateErrorType;

    /// Set the radio's data rate.
    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::DataRateErrorType>;

    /// Get the radio's data rate.
    fn get_data_rate(&mut self) -> Result<DataRate, Self::DataRateErrorType>;
}

/// A trait to represent manipulation of Power Amplitude level
/// for an ESB capable transceiver.
pub trait EsbPaLevel {
    type PaLevelErrorType;

    /// Set the radio's Power Amplitude level.
    ///
    /// Use [`PaLevel::from_dbm()`] to convert a gain in dBm.
    fn set_pa_level(&mut self, pa_level: PaLevel) -> Result<(), Self::PaLevelErrorType>;

    /// Get the radio's Power Amplitude level.
    fn get_pa_level(&mut self) -> Result<PaLevel, Self::PaLevelErrorType>;
}

/// A trait to represent manipulation of a radio's configuration.
pub trait EsbInit {
    type ConfigErrorType;

    /// Initialize the radio's hardware and apply [`RadioConfig::default()`].
    fn init(&mut self) -> Result<(), Self::ConfigErrorType>;

    /// Reconfigure the radio using the given `config` object.
    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType>;
}

/// A trait to represent the RX and TX operation of an ESB capable transceiver.
pub trait EsbRadio {
    type RadioErrorType;

    /// Put the radio into active RX mode (powering it up if needed).
    fn enable_rx_mode(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Leave active RX mode for standby.
    fn disable_rx_mode(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Put the radio into active TX mode (powering it up if needed).
    ///
    /// Any stale TX events are cleared first.
    fn enable_tx_mode(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Leave active TX mode for standby, clearing the TX events.
    fn disable_tx_mode(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Wait for the current transmission to finish.
    ///
    /// With [`WaitMode::NonBlocking`], the current state is reported
    /// (possibly [`TxOutcome::Pending`]).
    /// With [`WaitMode::Blocking`], the STATUS register is polled until
    /// the transmission finishes or the [`PollLimit`] runs out.
    fn wait_for_tx_complete(&mut self, mode: WaitMode) -> Result<TxOutcome, Self::RadioErrorType>;

    /// Transmit whatever is in the TX FIFO and wait for the result.
    ///
    /// The radio is powered down when this returns successfully.
    fn attempt_tx(&mut self, limit: PollLimit) -> Result<TxOutcome, Self::RadioErrorType>;

    /// Prepare a payload for transmission (without transmitting it).
    ///
    /// If auto-ack is enabled on pipe 0, the TX address is copied to
    /// pipe 0 so the ACK packet can be received.
    fn submit_data(&mut self, data: &[u8]) -> Result<(), Self::RadioErrorType>;

    /// [`EsbRadio::submit_data()`] and [`EsbRadio::attempt_tx()`] combined.
    fn send_data(&mut self, data: &[u8], limit: PollLimit)
        -> Result<TxOutcome, Self::RadioErrorType>;

    /// Like [`EsbRadio::send_data()`], but to the given `address`.
    ///
    /// The radio's TX address is changed.
    fn send_data_to(
        &mut self,
        address: &[u8; 5],
        data: &[u8],
        limit: PollLimit,
    ) -> Result<TxOutcome, Self::RadioErrorType>;

    /// Listen until any pipe has received a payload, then return to standby.
    ///
    /// Returns the pipe number of the received payload.
    fn wait_for_data_rx(&mut self, limit: PollLimit) -> Result<u8, Self::RadioErrorType>;

    /// Read the payload received on `pipe` into `buf`.
    ///
    /// Returns `None` if no payload is waiting. The RX Data Ready event is cleared
    /// after reading. It is an error if the waiting payload came from a different
    /// pipe or if `buf` is too small to hold it.
    fn read_data(&mut self, pipe: u8, buf: &mut [u8]) -> Result<Option<u8>, Self::RadioErrorType>;
}
