//! Lock motor driver (L293D-style H-bridge).
//!
//! Two direction inputs plus a PWM enable:
//!
//! | IN1 | IN2 | Motion        |
//! |-----|-----|---------------|
//! |  1  |  0  | unlock (CW)   |
//! |  0  |  1  | lock (CCW)    |
//! |  0  |  0  | stop (coast)  |
//!
//! The enable is always dropped to 0 % before the direction pins change,
//! so the bridge never sees both legs switching under load.
//!
//! Generic over `embedded-hal` 1.0 so the same driver runs on ESP-IDF
//! `PinDriver` / `LedcDriver` and on the host simulation pins.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::MotorDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Running { direction: MotorDirection, speed: u8 },
}

pub struct MotorDriver<A, B, P> {
    in1: A,
    in2: B,
    enable: P,
    state: MotorState,
}

impl<A: OutputPin, B: OutputPin, P: SetDutyCycle> MotorDriver<A, B, P> {
    pub fn new(in1: A, in2: B, enable: P) -> Self {
        let mut motor = Self {
            in1,
            in2,
            enable,
            state: MotorState::Stopped,
        };
        motor.stop();
        motor
    }

    /// Rotate at `speed` percent.  `Stop` or a zero speed stops the motor.
    pub fn rotate(&mut self, direction: MotorDirection, speed: u8) {
        let speed = speed.min(100);
        if speed == 0 || direction == MotorDirection::Stop {
            self.stop();
            return;
        }

        self.set_duty_hw(0);
        let (in1, in2) = match direction {
            MotorDirection::Unlock => (true, false),
            _ => (false, true),
        };
        self.set_legs_hw(in1, in2);
        self.set_duty_hw(speed);

        self.state = MotorState::Running { direction, speed };
    }

    pub fn stop(&mut self) {
        self.set_duty_hw(0);
        self.set_legs_hw(false, false);
        self.state = MotorState::Stopped;
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }

    fn set_legs_hw(&mut self, in1: bool, in2: bool) {
        let r1 = self.in1.set_state(in1.into());
        let r2 = self.in2.set_state(in2.into());
        if r1.is_err() || r2.is_err() {
            warn!("Motor: direction pin write failed");
        }
    }

    fn set_duty_hw(&mut self, percent: u8) {
        if self.enable.set_duty_cycle_percent(percent).is_err() {
            warn!("Motor: PWM duty update to {}% failed", percent);
        }
    }
}
