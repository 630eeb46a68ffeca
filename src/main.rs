use clap::{Parser, Subcommand};
use noisewire::cli::{
    corrupt_packet, run_relay, send_line, show_packet, CorruptOptions, InspectOptions,
    RelayOptions, SendOptions,
};
use noisewire::corrupt::{OperatorKind, DEFAULT_CAPACITY};
use noisewire::method::Method;
use noisewire::Result;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("NOISEWIRE_VERSION");
const PROFILE: &str = env!("NOISEWIRE_PROFILE");
const GIT_HASH: &str = env!("NOISEWIRE_GIT_HASH");

#[derive(Parser)]
#[command(name = "noisewire")]
#[command(author, about = "Redundancy codes over a deliberately noisy channel", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode one line of text and optionally send it to a relay
    #[command(alias = "s")]
    Send {
        /// PARITY, 2DPAR, CRC16, HAMMING, CHECKSUM, or menu number 1-5
        #[arg(long, short, default_value = "CRC16", value_parser = parse_method)]
        method: Method,

        /// Text to send (read one line from stdin when omitted)
        #[arg(long)]
        text: Option<String>,

        /// Relay address, e.g. 127.0.0.1:5000
        #[arg(long)]
        to: Option<String>,
    },

    /// Relay one packet from a sender to a receiver, corrupting the payload
    #[command(alias = "r")]
    Relay {
        /// Port to listen on
        #[arg(long, short)]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Seed for reproducible noise
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum payload length insertion noise may grow to
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
    },

    /// Corrupt a packet read from a file or stdin and print the forwarded packet
    #[command(alias = "c")]
    Corrupt {
        /// Packet file (stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Seed for reproducible noise
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum payload length insertion noise may grow to
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,

        /// Apply these operators instead of a random draw (comma separated)
        #[arg(long, value_delimiter = ',', value_parser = parse_operator)]
        operators: Option<Vec<OperatorKind>>,

        /// Print a JSON report instead of the forwarded packet
        #[arg(long)]
        json: bool,
    },

    /// Describe the fields of a packet
    #[command(alias = "i")]
    Inspect {
        /// Packet file (stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_method(s: &str) -> std::result::Result<Method, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_operator(s: &str) -> std::result::Result<OperatorKind, String> {
    s.parse().map_err(|e| format!("{}", e))
}

/// Read a packet from a file or stdin; a trailing line ending is dropped
fn read_packet(input: Option<&PathBuf>) -> Result<Vec<u8>> {
    let mut data = match input {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    if data.ends_with(b"\n") {
        data.pop();
        if data.ends_with(b"\r") {
            data.pop();
        }
    }
    Ok(data)
}

/// Prompt for one line on stdin; end of input before any text is an error
fn read_line() -> Result<String> {
    eprint!("Enter text (single line): ");
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input on stdin").into());
    }
    Ok(line)
}

fn write_packet(wire: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(wire)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Send { method, text, to } => {
            let line = match text {
                Some(text) => text,
                None => read_line()?,
            };
            let options = SendOptions { method, to };
            let outcome = send_line(&line, &options)?;
            if outcome.transmitted {
                println!(
                    "Sent packet ({} bytes): {}",
                    outcome.wire.len(),
                    String::from_utf8_lossy(&outcome.wire)
                );
            } else {
                write_packet(&outcome.wire)?;
            }
            Ok(())
        }

        Commands::Relay {
            port,
            bind,
            seed,
            capacity,
        } => {
            let options = RelayOptions {
                bind,
                port,
                seed,
                capacity,
            };
            let forwarded = run_relay(&options)?;
            println!("Original Data: {}", forwarded.received.payload_lossy());
            println!("Method: {}", forwarded.received.method);
            println!("Control: {}", forwarded.received.redundancy);
            println!("Corrupted Data: {}", forwarded.forwarded.payload_lossy());
            println!("Noise: {}", forwarded.report.summary());
            println!(
                "Forwarded corrupted packet: {}",
                String::from_utf8_lossy(&forwarded.wire())
            );
            Ok(())
        }

        Commands::Corrupt {
            input,
            seed,
            capacity,
            operators,
            json,
        } => {
            let wire = read_packet(input.as_ref())?;
            let options = CorruptOptions {
                seed,
                capacity,
                operators,
            };
            let forwarded = corrupt_packet(&wire, &options)?;
            if json {
                println!("{}", forwarded.to_json()?);
            } else {
                write_packet(&forwarded.wire())?;
            }
            Ok(())
        }

        Commands::Inspect { input, json } => {
            let wire = read_packet(input.as_ref())?;
            print!("{}", show_packet(&wire, &InspectOptions { json })?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.version {
        println!("noisewire {} {} ({})", PROFILE, VERSION, GIT_HASH);
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
