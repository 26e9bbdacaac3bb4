use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use wrun_host::{Config, DEFAULT_ENTRY, Runtime};

/// Run a WebAssembly module with WASI inherited from this process
#[derive(Parser, Debug)]
#[command(name = "wrun", version)]
struct Args {
    /// Path to the wasm bytecode file
    path: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), wrun_host::Error> {
    // The guest inherits argv, env and stdio verbatim (the default config),
    // so a WASI command module behaves like a child of this process.
    let mut runtime = Runtime::new(Config::default(), &args.path)?;
    runtime.run(DEFAULT_ENTRY)
}
