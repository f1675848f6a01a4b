//! CLI interface for dmxbridge

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dmxbridge::bridge::{BROADCAST_INTERVAL_MS, DEFAULT_NAMESPACE};

/// MIDI map driven control bridge for DMX lighting
#[derive(Parser)]
#[command(name = "dmxbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a MIDI map file
    Check {
        /// MIDI map file path
        #[arg(short, long, default_value = "midimap.json")]
        map: PathBuf,
    },

    /// Print the parameter table derived from a MIDI map
    Show {
        /// MIDI map file path
        #[arg(short, long, default_value = "midimap.json")]
        map: PathBuf,
    },

    /// List available MIDI output ports
    Ports,

    /// Run the bridge: re-broadcast all parameters periodically until ctrl-c
    Run {
        /// MIDI map file path
        #[arg(short, long, default_value = "midimap.json")]
        map: PathBuf,

        /// MIDI output port name (substring match; first port if omitted)
        #[arg(short, long)]
        port: Option<String>,

        /// Initially selected group id
        #[arg(short, long, default_value = "0")]
        group: String,

        /// Topic namespace for published values
        #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,

        /// Re-broadcast interval in milliseconds
        #[arg(short, long, default_value_t = BROADCAST_INTERVAL_MS)]
        interval: u64,
    },

    /// Generate an example MIDI map file
    Init,
}
