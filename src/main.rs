use clap::{ArgGroup, Parser};
use sertool::config::{Config, ConfigLoader};
use sertool::device::{ControlDevice, DeviceError};
use sertool::message::MAX_RECEIVE_CAPACITY;
use sertool::{
    execute, logging, report, AppError, AppResult, Command, Limits, MessageFlags, Outcome,
    ParameterCodec, ProtocolRevision, RawParameters, SerialParameters,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "sertool",
    version,
    about = "Tool for /dev/serial.",
    long_about = "Reads and writes the line parameters of a /dev/serial style character device, clears its receive buffer, and sends or receives single messages through its ioctl control protocol."
)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["set", "get", "rx_buff_clear", "send", "receive"])
))]
struct Args {
    /// Character device to operate on.
    device: PathBuf,

    /// Apply the given parameters.
    #[arg(short = 's', long)]
    set: bool,

    /// Print the device's current parameters.
    #[arg(short = 'g', long)]
    get: bool,

    /// Clear the device's receive buffer.
    #[arg(short = 'c', long)]
    rx_buff_clear: bool,

    /// Send TEXT as one message.
    #[arg(short = 'w', long, value_name = "TEXT")]
    send: Option<String>,

    /// Receive one message into a buffer of CAPACITY bytes (1 to 1048576).
    #[arg(
        short = 'R',
        long,
        value_name = "CAPACITY",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RECEIVE_CAPACITY))
    )]
    receive: Option<u32>,

    /// Baud rate (0 to 3688400).
    #[arg(short = 'b', long = "baudrate", allow_negative_numbers = true)]
    baud_rate: Option<i64>,

    /// Data bits per character.
    #[arg(short = 'd', long, allow_negative_numbers = true)]
    data_bits: Option<i64>,

    /// Parity: n (none), e (even) or o (odd).
    #[arg(short = 'p', long)]
    parity: Option<char>,

    /// Stop bits (1 to 64).
    #[arg(short = 'o', long, allow_negative_numbers = true)]
    stop_bits: Option<i64>,

    /// Receive timeout in milliseconds (0 to 300000).
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    rcv_timeout: Option<i64>,

    /// Transmit timeout in milliseconds (0 to 300000).
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    xmit_timeout: Option<i64>,

    /// Receive FIFO interrupt trigger level.
    #[arg(long, allow_negative_numbers = true)]
    rx_fifo_trigger: Option<i64>,

    /// Transmit FIFO interrupt trigger level.
    #[arg(long, allow_negative_numbers = true)]
    tx_fifo_trigger: Option<i64>,

    /// Enable or disable DMA transfers.
    #[arg(long, value_name = "BOOL")]
    dma: Option<bool>,

    /// Receive FIFO DMA trigger level.
    #[arg(long, allow_negative_numbers = true)]
    rx_fifo_dma_trigger: Option<i64>,

    /// Transmit FIFO DMA trigger level.
    #[arg(long, allow_negative_numbers = true)]
    tx_fifo_dma_trigger: Option<i64>,

    /// Receive DMA granularity.
    #[arg(long, allow_negative_numbers = true)]
    rx_gran: Option<i64>,

    /// Transmit DMA granularity.
    #[arg(long, allow_negative_numbers = true)]
    tx_gran: Option<i64>,

    /// Wait for transmission to complete before returning.
    #[arg(long)]
    wait_for_xmit: bool,

    /// Driver protocol revision; decides the legal data-bits range.
    #[arg(long, value_enum)]
    protocol: Option<ProtocolRevision>,

    /// Read configuration from PATH instead of the default locations.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Log every control exchange.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn raw_parameters(&self) -> RawParameters {
        RawParameters {
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            parity: self.parity,
            stop_bits: self.stop_bits,
            rcv_timeout: self.rcv_timeout,
            xmit_timeout: self.xmit_timeout,
            rx_fifo_trigger: self.rx_fifo_trigger,
            tx_fifo_trigger: self.tx_fifo_trigger,
            dma: self.dma,
            rx_fifo_dma_trigger: self.rx_fifo_dma_trigger,
            tx_fifo_dma_trigger: self.tx_fifo_dma_trigger,
            rx_gran: self.rx_gran,
            tx_gran: self.tx_gran,
            wait_for_xmit: self.wait_for_xmit,
        }
    }

    fn message_flags(&self) -> MessageFlags {
        if self.wait_for_xmit {
            MessageFlags::WAIT_FOR_XMIT
        } else {
            MessageFlags::empty()
        }
    }

    fn command(&self, params: SerialParameters) -> Command {
        if let Some(text) = &self.send {
            Command::Send {
                payload: text.clone().into_bytes(),
                flags: self.message_flags(),
            }
        } else if let Some(capacity) = self.receive {
            Command::Receive {
                capacity: capacity as usize,
                flags: MessageFlags::empty(),
            }
        } else if self.get {
            Command::Get
        } else if self.rx_buff_clear {
            Command::ClearReceiveBuffer
        } else {
            Command::Set(params)
        }
    }
}

fn load_config(path: Option<&Path>) -> AppResult<Config> {
    let loader = match path {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    Ok(loader.into_config())
}

#[cfg(unix)]
fn open_device(path: &Path) -> Result<Box<dyn ControlDevice>, DeviceError> {
    Ok(Box::new(sertool::CharDevice::open(path)?))
}

#[cfg(not(unix))]
fn open_device(_path: &Path) -> Result<Box<dyn ControlDevice>, DeviceError> {
    Err(DeviceError::Unsupported)
}

/// Validate everything, then open the device and run exactly one exchange.
fn run(args: &Args, config: &Config) -> AppResult<Outcome> {
    let limits = match args.protocol {
        Some(revision) => Limits::for_revision(revision),
        None => config.protocol.limits(),
    };
    let codec = ParameterCodec::new(limits).with_defaults(config.defaults.clone());
    let params = codec.validate(&args.raw_parameters())?;
    let command = args.command(params);

    let mut device = open_device(&args.device)?;
    execute(&mut device, command)
}

fn print_outcome(outcome: &Outcome, json: bool) {
    if json {
        let value = report::render_json(outcome);
        match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{value}"),
        }
    } else {
        print!("{}", report::render_text(outcome));
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    if let Err(e) = logging::init(&config.logging, args.verbose) {
        eprintln!("warning: logging disabled: {e}");
    }

    match run(&args, &config) {
        Ok(outcome) => {
            print_outcome(&outcome, args.json);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&args.device, &e),
    }
}

/// Report a fatal error once on stderr and pick the exit status.
fn fail(device: &Path, err: &AppError) -> ExitCode {
    debug!(device = %device.display(), error = ?err, "sertool failed");
    eprintln!("error: {err}");
    ExitCode::from(err.exit_code())
}
