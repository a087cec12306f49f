//! [`ClockPort`] adapters.
//!
//! - [`SystemClock`] sleeps the calling thread (simulator and tests).
//! - [`DelayClock`] drives any `embedded-hal` [`DelayNs`] provider; the
//!   control board runs on the ESP-IDF `Delay`.

use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;

/// Thread-sleeping clock with a configurable tick length.
pub struct SystemClock {
    tick: Duration,
}

impl SystemClock {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }
}

impl ClockPort for SystemClock {
    fn wait_ticks(&mut self, ticks: u16) {
        std::thread::sleep(self.tick * u32::from(ticks));
    }

    fn pause_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Tick clock over an `embedded-hal` delay provider.
pub struct DelayClock<D> {
    delay: D,
    tick_ms: u32,
}

impl<D: DelayNs> DelayClock<D> {
    pub fn new(delay: D, tick_ms: u32) -> Self {
        Self { delay, tick_ms }
    }
}

impl<D: DelayNs> ClockPort for DelayClock<D> {
    fn wait_ticks(&mut self, ticks: u16) {
        // One tick at a time keeps each delay call well inside u32 ms.
        for _ in 0..ticks {
            self.delay.delay_ms(self.tick_ms);
        }
    }

    fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
