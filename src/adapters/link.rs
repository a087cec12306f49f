//! [`Transport`] adapters for the inter-ECU link.
//!
//! | Adapter       | Medium                          | Observes hang-up |
//! |---------------|---------------------------------|------------------|
//! | `ChannelLink` | in-process `std::sync::mpsc`    | yes              |
//! | `UartLink`    | ESP-IDF UART driver             | no               |
//!
//! Both block indefinitely on receive; neither adds a timeout.

use std::sync::mpsc::{Receiver, Sender, channel};

use log::trace;

use crate::app::ports::Transport;
use crate::error::LinkError;

// ── In-process link ───────────────────────────────────────────

/// One end of an in-memory byte link.  Used by the host simulator and the
/// end-to-end tests to wire the two nodes together.
pub struct ChannelLink {
    tx: Sender<u8>,
    rx: Receiver<u8>,
    label: &'static str,
}

impl ChannelLink {
    /// Two connected ends: whatever one sends the other receives.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = channel();
        let (b_tx, a_rx) = channel();
        (
            Self {
                tx: a_tx,
                rx: a_rx,
                label: "hmi",
            },
            Self {
                tx: b_tx,
                rx: b_rx,
                label: "control",
            },
        )
    }
}

impl Transport for ChannelLink {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        trace!("{} >> 0x{:02x}", self.label, byte);
        self.tx.send(byte).map_err(|_| LinkError::Closed)
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        let byte = self.rx.recv().map_err(|_| LinkError::Closed)?;
        trace!("{} << 0x{:02x}", self.label, byte);
        Ok(byte)
    }
}

// ── UART link (device) ────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use uart::UartLink;

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_hal::delay::BLOCK;
    use esp_idf_hal::uart::UartDriver;
    use log::warn;

    use crate::app::ports::Transport;
    use crate::error::LinkError;

    /// 8N1 UART to the peer ECU.
    pub struct UartLink<'d> {
        uart: UartDriver<'d>,
    }

    impl<'d> UartLink<'d> {
        pub fn new(uart: UartDriver<'d>) -> Self {
            Self { uart }
        }
    }

    impl Transport for UartLink<'_> {
        fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
            self.uart.write(&[byte]).map_err(|e| {
                warn!("UART write failed: {}", e);
                LinkError::Io
            })?;
            Ok(())
        }

        fn receive_byte(&mut self) -> Result<u8, LinkError> {
            let mut byte = [0u8; 1];
            loop {
                match self.uart.read(&mut byte, BLOCK) {
                    Ok(1) => return Ok(byte[0]),
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("UART read failed: {}", e);
                        return Err(LinkError::Io);
                    }
                }
            }
        }
    }
}
