//! PIR motion sensor (HC-SR501 style: output high while motion is seen).

use embedded_hal::digital::InputPin;

use crate::app::ports::{OccupancySensor, SensorError};

pub struct PirSensor<P> {
    pin: P,
}

impl<P: InputPin> PirSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> OccupancySensor for PirSensor<P> {
    fn is_occupied(&mut self) -> Result<bool, SensorError> {
        self.pin.is_high().map_err(|_| SensorError::GpioReadFailed)
    }
}
