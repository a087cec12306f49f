//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter            | Implements                 | Connects to                |
//! |--------------------|----------------------------|----------------------------|
//! | `board`            | all control / HMI ports    | bundles of the below       |
//! | `console`          | OperatorPort               | stdin keypad, stdout LCD   |
//! | `credential_store` | CredentialStore            | NVS blob or EEPROM bytes   |
//! | `link`             | Transport                  | mpsc channel / ESP UART    |
//! | `log_sink`         | EventSink                  | `log` facade               |
//! | `nvs`              | StoragePort, ConfigPort    | NVS / in-memory store      |
//! | `presence`         | OccupancySensor            | scripted occupancy         |
//! | `time`             | ClockPort                  | thread sleep / `DelayNs`   |

pub mod board;
pub mod console;
pub mod credential_store;
pub mod link;
pub mod log_sink;
pub mod nvs;
pub mod presence;
pub mod time;
