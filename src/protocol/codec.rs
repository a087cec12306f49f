//! START-delimited credential frame codec.
//!
//! Wire format:
//! ```text
//! ┌──────────────┬──────────────────────────┐
//! │ START (0x15) │ credential (5 B, opaque) │
//! └──────────────┴──────────────────────────┘
//! ```
//!
//! There is no length field: both ends know the payload is
//! [`CREDENTIAL_LEN`] bytes.  While waiting for START the decoder drops
//! every other byte without complaint.  That is the protocol's only
//! resynchronisation mechanism after line noise or a desync, so it is a
//! state of the decoder, not an error path.  Once START has been seen,
//! the next five bytes are payload even if one of them happens to be 0x15.

use log::debug;

use super::START;
use super::credential::{CREDENTIAL_LEN, Credential};
use crate::app::ports::Transport;
use crate::error::LinkError;

/// Frame size on the wire (START + payload).
pub const FRAME_LEN: usize = 1 + CREDENTIAL_LEN;

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Discarding bytes until START.
    AwaitingStart { discarded: usize },
    /// START seen, collecting payload.
    ReadingPayload { collected: usize },
}

/// Streaming credential frame decoder.
pub struct CredentialDecoder {
    state: DecoderState,
    payload: [u8; CREDENTIAL_LEN],
}

impl Default for CredentialDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::AwaitingStart { discarded: 0 },
            payload: [0; CREDENTIAL_LEN],
        }
    }

    /// Feed a single byte.  Returns the credential once the fifth payload
    /// byte arrives; the decoder is then ready for the next frame.
    pub fn feed_byte(&mut self, byte: u8) -> Option<Credential> {
        match &mut self.state {
            DecoderState::AwaitingStart { discarded } => {
                if byte == START {
                    if *discarded > 0 {
                        debug!("codec: resynchronised after {} stray byte(s)", discarded);
                    }
                    self.state = DecoderState::ReadingPayload { collected: 0 };
                } else {
                    *discarded += 1;
                }
                None
            }

            DecoderState::ReadingPayload { collected } => {
                self.payload[*collected] = byte;
                *collected += 1;

                if *collected == CREDENTIAL_LEN {
                    self.state = DecoderState::AwaitingStart { discarded: 0 };
                    return Some(Credential::new(self.payload));
                }
                None
            }
        }
    }

    /// Feed a chunk of bytes.  Stops at the first complete credential and
    /// returns it together with the number of bytes consumed; the rest of
    /// `data` is left for the next call.
    pub fn feed(&mut self, data: &[u8]) -> Option<(Credential, usize)> {
        for (i, &byte) in data.iter().enumerate() {
            if let Some(credential) = self.feed_byte(byte) {
                return Some((credential, i + 1));
            }
        }
        None
    }

    /// Number of stray bytes dropped since the last START.
    pub fn discarded(&self) -> usize {
        match self.state {
            DecoderState::AwaitingStart { discarded } => discarded,
            DecoderState::ReadingPayload { .. } => 0,
        }
    }

    /// Whether a frame is partially received.
    pub fn in_frame(&self) -> bool {
        matches!(self.state, DecoderState::ReadingPayload { .. })
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.state = DecoderState::AwaitingStart { discarded: 0 };
    }
}

/// Encode a credential into its on-wire frame.
pub fn encode_credential(credential: &Credential) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = START;
    frame[1..].copy_from_slice(credential.as_bytes());
    frame
}

/// Send one framed credential, byte by byte.
pub fn send_credential<T: Transport + ?Sized>(
    link: &mut T,
    credential: &Credential,
) -> Result<(), LinkError> {
    for byte in encode_credential(credential) {
        link.send_byte(byte)?;
    }
    Ok(())
}

/// Block until one complete framed credential has been received,
/// discarding anything that precedes START.
pub fn receive_credential<T: Transport + ?Sized>(link: &mut T) -> Result<Credential, LinkError> {
    let mut decoder = CredentialDecoder::new();
    loop {
        let byte = link.receive_byte()?;
        if let Some(credential) = decoder.feed_byte(byte) {
            return Ok(credential);
        }
    }
}
