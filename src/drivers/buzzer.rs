//! Active alarm buzzer on one GPIO (active high).

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct BuzzerDriver<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> BuzzerDriver<P> {
    pub fn new(pin: P) -> Self {
        let mut buzzer = Self { pin, on: false };
        buzzer.set(false);
        buzzer
    }

    pub fn set(&mut self, on: bool) {
        if self.pin.set_state(on.into()).is_err() {
            warn!("Buzzer: pin write failed");
            return;
        }
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
