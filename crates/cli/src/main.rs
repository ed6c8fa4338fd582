//! L2 cache model CLI.
//!
//! This binary drives the cache engine from a request trace. It performs:
//! 1. **Configuration:** JSON config file (`CacheConfig`) or built-in defaults.
//! 2. **Backing store:** In-memory RAM, optionally seeded from an image file.
//! 3. **Trace run:** One request per line, responses printed as they retire,
//!    followed by the statistics report.

use clap::{Parser, Subcommand};
use std::{fs, process};

use l2sim_core::{CacheConfig, CacheController, Op, Ram, Request, Response, Status};

#[derive(Parser, Debug)]
#[command(
    name = "l2sim",
    author,
    version,
    about = "Set-associative write-back L2 cache model",
    long_about = "Run a request trace against the cache engine.\n\nTrace format, one request per line ('#' starts a comment):\n  load <addr>\n  store <addr> <mask> <hex-bytes>\n\nAddresses are line-aligned. The store payload is repeated to fill one line.\n\nExamples:\n  l2sim run -t traces/demo.trace\n  l2sim run -t trace.txt --config cache.json --image ram.bin"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a request trace against a fresh cache.
    Run {
        /// Trace file: one `load`/`store` request per line.
        #[arg(short, long)]
        trace: String,

        /// JSON cache configuration (built-in defaults when omitted).
        #[arg(long)]
        config: Option<String>,

        /// Binary image loaded at the base of the backing RAM.
        #[arg(long)]
        image: Option<String>,

        /// Backing RAM size in bytes.
        #[arg(long, default_value_t = 1 << 20)]
        ram_size: usize,

        /// Backing RAM base address.
        #[arg(long, default_value_t = 0)]
        ram_base: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            trace,
            config,
            image,
            ram_size,
            ram_base,
        } => cmd_run(&trace, config.as_deref(), image.as_deref(), ram_size, ram_base),
    }
}

/// Runs the trace: builds a cache over a seeded RAM, submits every request
/// in order, then prints the statistics report.
fn cmd_run(
    trace_path: &str,
    config_path: Option<&str>,
    image_path: Option<&str>,
    ram_size: usize,
    ram_base: u64,
) {
    let config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config {}: {}", path, e);
                process::exit(1);
            });
            serde_json::from_str::<CacheConfig>(&text).unwrap_or_else(|e| {
                eprintln!("Error parsing config {}: {}", path, e);
                process::exit(1);
            })
        }
        None => CacheConfig::default(),
    };
    let geom = config.geometry();
    println!(
        "Configuration: {} sets x {} ways x {} B lines, {:?} replacement",
        geom.sets, geom.ways, geom.line_bytes, config.policy
    );
    println!();

    let mut ram = Ram::new(ram_size, ram_base);
    if let Some(path) = image_path {
        let image = fs::read(path).unwrap_or_else(|e| {
            eprintln!("Error reading image {}: {}", path, e);
            process::exit(1);
        });
        ram.load(&image, 0);
    }

    let text = fs::read_to_string(trace_path).unwrap_or_else(|e| {
        eprintln!("Error reading trace {}: {}", trace_path, e);
        process::exit(1);
    });

    let mut cache = CacheController::new(&config, ram);
    for (lineno, line) in text.lines().enumerate() {
        let parsed = parse_request(line, geom.line_bytes).unwrap_or_else(|e| {
            eprintln!("Error: {}:{}: {}", trace_path, lineno + 1, e);
            process::exit(1);
        });
        let Some(request) = parsed else {
            continue; // blank or comment
        };

        let addr = request.addr;
        match cache.submit(request) {
            Ok(response) => print_response(addr, &response),
            Err(e) => {
                eprintln!("Error: {}:{}: {}", trace_path, lineno + 1, e);
                process::exit(1);
            }
        }
    }

    println!();
    println!("{}", cache.stats().report());
}

/// Parses one trace line into a request. Blank lines and comments yield
/// `Ok(None)`; a short store payload is repeated to cover the full line.
fn parse_request(line: &str, line_bytes: usize) -> Result<Option<Request>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    let mut fields = line.split_whitespace();
    let op = fields.next().unwrap_or("");
    let addr = parse_u64(fields.next().ok_or("missing address")?)?;

    let request = match op {
        "load" => Request::load(addr),
        "store" => {
            let mask = parse_u64(fields.next().ok_or("missing store mask")?)?;
            let pattern = parse_hex_bytes(fields.next().ok_or("missing store data")?)?;
            if pattern.is_empty() {
                return Err("empty store data".into());
            }
            let data: Vec<u8> = pattern.iter().copied().cycle().take(line_bytes).collect();
            Request::store(addr, data, mask)
        }
        other => return Err(format!("unknown op '{}'", other)),
    };
    if fields.next().is_some() {
        return Err("trailing fields".into());
    }
    Ok(Some(request))
}

fn parse_u64(field: &str) -> Result<u64, String> {
    let parsed = match field.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => field.parse(),
    };
    parsed.map_err(|_| format!("bad number '{}'", field))
}

fn parse_hex_bytes(field: &str) -> Result<Vec<u8>, String> {
    if field.len() % 2 != 0 {
        return Err(format!("odd-length hex data '{}'", field));
    }
    (0..field.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&field[i..i + 2], 16)
                .map_err(|_| format!("bad hex data '{}'", field))
        })
        .collect()
}

fn print_response(addr: u64, response: &Response) {
    let op = match response.op {
        Op::Load => "load ",
        Op::Store => "store",
    };
    let status = match response.status {
        Status::Hit => "HIT ",
        Status::Miss => "MISS",
    };
    let data: String = response.data.iter().map(|b| format!("{b:02x}")).collect();
    println!(
        "{} {:#010x}  {}  way={} update={}  {}",
        op, addr, status, response.way, response.update, data
    );
}
