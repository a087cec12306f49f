//! Blackboard for the interaction node's state handlers.

use log::debug;

use crate::app::events::DoorEvent;
use crate::app::ports::{EventSink, InteractionHardware};
use crate::config::LockConfig;
use crate::error::Result;
use crate::protocol::{CREDENTIAL_LEN, Command, Credential};

use super::screen::Screen;

pub struct InteractionContext<H, E> {
    /// Link, keypad, display and clock.
    pub hw: H,
    pub sink: E,
    pub config: LockConfig,

    /// Mirrors the control node's counter; both move on the same verdicts.
    pub attempts: u8,
    /// Menu choice carried into `Operation`.
    pub pending: Option<Command>,
    /// Set once the first credential has been accepted.
    pub provisioned: bool,
}

impl<H: InteractionHardware, E: EventSink> InteractionContext<H, E> {
    pub fn new(hw: H, sink: E, config: LockConfig) -> Self {
        Self {
            hw,
            sink,
            config,
            attempts: 0,
            pending: None,
            provisioned: false,
        }
    }

    pub(crate) fn emit(&mut self, event: DoorEvent) {
        self.sink.emit(&event);
    }

    pub(crate) fn show(&mut self, screen: Screen) {
        screen.show(&mut self.hw);
    }

    /// Show `screen` and hold it for the configured message time.
    pub(crate) fn flash(&mut self, screen: Screen) {
        self.show(screen);
        self.hw.pause_ms(self.config.message_ms);
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= self.config.max_attempts
    }

    /// Read five symbols, echoing a mask character for each, then wait
    /// for the confirmation key.
    ///
    /// Keys pressed after the fifth symbol and before the confirmation key
    /// are dropped.  The wait starts from "no key yet", which can never
    /// equal the confirmation key.
    pub fn collect_candidate(&mut self) -> Result<Credential> {
        let mut symbols = [0u8; CREDENTIAL_LEN];
        for slot in symbols.iter_mut() {
            *slot = self.hw.get_pressed_key()?;
            self.hw.put_char('*');
            self.hw.pause_ms(self.config.key_settle_ms);
        }

        let confirm = self.config.confirm_key;
        let mut last: Option<u8> = None;
        while last != Some(confirm) {
            if let Some(key) = last {
                debug!("Dropping key 0x{:02x} while awaiting confirmation", key);
                self.hw.pause_ms(self.config.confirm_poll_ms);
            }
            last = Some(self.hw.get_pressed_key()?);
        }

        Ok(Credential::new(symbols))
    }
}
