//! Doorlock host simulator.
//!
//! Runs both ECUs in one process, each on its own thread, joined by an
//! in-memory serial link:
//!
//! ```text
//! ┌──────────────── main thread ───────────────┐      ┌──────── control-ecu thread ────────┐
//! │ InteractionNode                            │      │ ControlNode                        │
//! │  ConsoleOperator (stdin keys, stdout LCD)  │ link │  credential store (EEPROM or NVS)  │
//! │  SystemClock                               │◀────▶│  motor + buzzer on sim pins        │
//! │                                            │      │  PresenceSimulator, SystemClock    │
//! └────────────────────────────────────────────┘      └────────────────────────────────────┘
//! ```
//!
//! Type keys followed by Enter: digits are credential symbols, `+` opens
//! the door, `-` changes the password.  End of input (Ctrl-D) shuts both
//! nodes down.

use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use log::info;
use tracing_subscriber::EnvFilter;

use doorlock::adapters::board::{ControlBoard, DoorActuators, InteractionBoard};
use doorlock::adapters::console::ConsoleOperator;
use doorlock::adapters::credential_store::{EepromCredentialStore, NvsCredentialStore};
use doorlock::adapters::link::ChannelLink;
use doorlock::adapters::log_sink::LogEventSink;
use doorlock::adapters::nvs::NvsStore;
use doorlock::adapters::presence::PresenceSimulator;
use doorlock::adapters::time::SystemClock;
use doorlock::app::ports::CredentialStore;
use doorlock::config::{LockConfig, validate_config};
use doorlock::control::ControlNode;
use doorlock::drivers::buzzer::BuzzerDriver;
use doorlock::drivers::eeprom::MemoryEeprom;
use doorlock::drivers::motor::MotorDriver;
use doorlock::drivers::sim::{SimPin, SimPwm};
use doorlock::error::Error;
use doorlock::interaction::InteractionNode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreKind {
    /// Five bytes in a simulated 24C16.
    Eeprom,
    /// One blob in the simulated NVS partition.
    Nvs,
}

/// Two-node door lock simulator.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with `LockConfig` overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the tick length in milliseconds.
    #[arg(long)]
    tick_ms: Option<u32>,

    /// Occupied polls the PIR reports before each clear.
    #[arg(long, default_value_t = 3)]
    occupied_polls: u32,

    /// Credential storage backend on the control node.
    #[arg(long, value_enum, default_value_t = StoreKind::Eeprom)]
    store: StoreKind,

    /// Log filter when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_config(args: &Args) -> Result<LockConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => LockConfig::default(),
    };
    if let Some(ms) = args.tick_ms {
        config.tick_period_ms = ms;
    }
    validate_config(&config)
        .map_err(Error::from)
        .context("invalid configuration")?;
    Ok(config)
}

fn run_control<S: CredentialStore>(
    link: ChannelLink,
    store: S,
    config: LockConfig,
    occupied_polls: u32,
) -> Error {
    let actuators = DoorActuators::new(
        MotorDriver::new(SimPin::new(), SimPin::new(), SimPwm::new()),
        BuzzerDriver::new(SimPin::new()),
    );
    let board = ControlBoard::new(
        link,
        store,
        actuators,
        PresenceSimulator::new(occupied_polls),
        SystemClock::new(config.tick_period()),
    );
    let mut node = ControlNode::new(board, LogEventSink::new(), config);
    node.start();
    let Err(e) = node.run();
    e
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    info!(
        "Doorlock simulator v{} | tick={}ms store={:?} occupied_polls={}",
        env!("CARGO_PKG_VERSION"),
        config.tick_period_ms,
        args.store,
        args.occupied_polls
    );

    let (hmi_link, control_link) = ChannelLink::pair();

    let control_config = config.clone();
    let store = args.store;
    let polls = args.occupied_polls;
    let control = thread::Builder::new()
        .name("control-ecu".into())
        .spawn(move || match store {
            StoreKind::Eeprom => {
                let eeprom = EepromCredentialStore::new(
                    MemoryEeprom::new(),
                    control_config.credential_address,
                );
                run_control(control_link, eeprom, control_config, polls)
            }
            StoreKind::Nvs => match NvsStore::new() {
                Ok(nvs) => run_control(
                    control_link,
                    NvsCredentialStore::new(nvs),
                    control_config,
                    polls,
                ),
                Err(e) => Error::Storage(e),
            },
        })
        .context("spawning control node")?;

    let board = InteractionBoard::new(
        hmi_link,
        ConsoleOperator::stdio(config.confirm_key),
        SystemClock::new(config.tick_period()),
    );
    let mut hmi = InteractionNode::new(board, LogEventSink::new(), config);
    hmi.start();
    let Err(hmi_exit) = hmi.run();
    // Dropping the HMI closes its end of the link and releases the control thread.
    drop(hmi);

    let control_exit = control
        .join()
        .map_err(|_| anyhow!("control node panicked"))?;
    info!("HMI stopped: {}; control stopped: {}", hmi_exit, control_exit);
    Ok(())
}
