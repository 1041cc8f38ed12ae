//! # Teletype
//!
//! Live terminal for the trigger and CV sequencer engine.
//!

use clap::Parser;
use std::path::PathBuf;

mod term;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding saved scenes
    #[arg(long, default_value = "scenes")]
    pub dir: PathBuf,

    /// Scene slot loaded at start
    #[arg(long)]
    pub scene: Option<usize>,

    /// Seed for the random operators
    #[arg(long)]
    pub seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    term::main(&args);
}
