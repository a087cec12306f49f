//! Peripheral drivers, generic over `embedded-hal` 1.0 traits.
//!
//! | Driver    | HAL traits               | Used by              |
//! |-----------|--------------------------|----------------------|
//! | `motor`   | `OutputPin`, `SetDutyCycle` | control board     |
//! | `buzzer`  | `OutputPin`              | control board        |
//! | `pir`     | `InputPin`               | control board        |
//! | `eeprom`  | `I2c`, `DelayNs`         | credential store     |
//! | `sim`     | implements the above     | host simulator, tests|

pub mod buzzer;
pub mod eeprom;
pub mod motor;
pub mod pir;
pub mod sim;
