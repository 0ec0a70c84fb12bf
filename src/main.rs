//! `superbin` prints the bin table, the chunk placements and the C++ array
//! literals for the configured waste target.
//!
//! ```bash
//! # defaults: 25% waste, 256 MiB max, 4 KiB pages
//! superbin > superalloc_config.txt
//!
//! # 10% waste with a shorter chunk list
//! superbin --waste-target 10 --chunk-size 64K --chunk-size 1M --chunk-size 256M
//! ```

use std::{
  any::Any,
  io::{
    self,
    Write,
  },
  panic::{
    self,
    AssertUnwindSafe,
  },
};

use anyhow::Context;
use clap::{
  Parser,
  ValueEnum,
};
use superbin::{
  Config,
  config::parse_size,
};
use superbin_classes::WasteTarget;
use tracing::{
  debug,
  error,
};
use tracing_subscriber::{
  EnvFilter,
  fmt,
  prelude::*,
};

#[derive(Parser, Debug)]
#[command(name = "superbin")]
#[command(version)]
#[command(about = "Generates bin and chunk tables for the superalloc allocator", long_about = None)]
struct Cli {
  /// Worst-case rounding waste per bin, in percent
  #[arg(long, value_enum, default_value_t = Waste::Percent25)]
  waste_target: Waste,

  /// Largest allocation size the bin table covers
  #[arg(long, default_value = "256M", value_parser = parse_size)]
  max_alloc_size: u64,

  /// Granularity in which chunk memory is committed
  #[arg(long, default_value = "4K", value_parser = parse_size)]
  page_size: u64,

  /// Chunk size to try, ascending; repeat to replace the built-in list
  #[arg(long = "chunk-size", value_parser = parse_size)]
  chunk_sizes: Vec<u64>,

  /// Log filter (trace, debug, info, warn, error or a full directive)
  #[arg(long, default_value = "warn", env = "RUST_LOG")]
  log_level: String,

  /// Disable colored log output
  #[arg(long)]
  no_color: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Waste {
  #[value(name = "10")]
  Percent10,
  #[value(name = "25")]
  Percent25,
}

impl Cli {
  fn config(&self) -> Config {
    let defaults = Config::default();
    let waste_target = match self.waste_target {
      Waste::Percent10 => WasteTarget::percent10(),
      Waste::Percent25 => WasteTarget::percent25(),
    };
    let chunk_sizes = if self.chunk_sizes.is_empty() {
      defaults.chunk_sizes
    } else {
      self.chunk_sizes.clone()
    };

    Config {
      waste_target,
      max_alloc_size: self.max_alloc_size,
      page_size: self.page_size,
      chunk_sizes,
    }
  }
}

/// Logs go to stderr; stdout carries only the tables.
fn setup_logging(cli: &Cli) {
  let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::registry()
    .with(
      fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(!cli.no_color),
    )
    .with(filter)
    .init();
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(msg) = payload.downcast_ref::<&str>() {
    *msg
  } else if let Some(msg) = payload.downcast_ref::<String>() {
    msg.as_str()
  } else {
    "unknown panic"
  }
}

fn execute(config: &Config) -> anyhow::Result<()> {
  let stdout = io::stdout();
  let mut out = stdout.lock();

  match panic::catch_unwind(AssertUnwindSafe(|| superbin::run(config, &mut out))) {
    Ok(written) => written.context("failed to write tables to stdout")?,
    Err(payload) => {
      writeln!(out, "Exception: {}", panic_message(payload.as_ref()))?;
      writeln!(out, "Done...")?;
    }
  }
  Ok(())
}

fn main() {
  let cli = Cli::parse();
  setup_logging(&cli);

  let config = cli.config();
  debug!(?config, "configuration");

  if let Err(err) = execute(&config) {
    error!("{err:#}");
  }
}
