//! dmxbridge - MIDI map driven control bridge for DMX lighting

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use dmxbridge::bridge::Bridge;
use dmxbridge::map;
use dmxbridge::output::{list_ports, LogPubSub, MidiCcSender};
use dmxbridge::params::ParameterRegistry;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { map: path } => {
            let midi_map = map::load_file(&path)?;

            if !midi_map.is_valid() {
                println!("MIDI map is incomplete: needs at least one group and one attribute.");
                std::process::exit(1);
            }

            println!("MIDI map is valid!");
            println!("  Groups: {}", midi_map.groups.len());
            for (id, name) in &midi_map.groups {
                println!("    {} -> {}", id, name);
            }
            println!("  Attributes: {}", midi_map.attributes.len());
            for (id, name) in &midi_map.attributes {
                println!("    {} -> {}", id, name);
            }
        }

        Commands::Show { map: path } => {
            let midi_map = map::load_file(&path)?;

            let mut registry = ParameterRegistry::new();
            registry.install(&midi_map)?;

            println!("Parameters derived from {:?}:\n", path);
            for spec in registry.specs() {
                println!(
                    "  {} ({}): {} to {} {}, default {}",
                    spec.id, spec.name, spec.min, spec.max, spec.unit, spec.default
                );
            }
        }

        Commands::Ports => {
            let ports = list_ports()?;

            if ports.is_empty() {
                println!("No MIDI output ports available.");
            } else {
                println!("MIDI output ports:");
                for name in ports {
                    println!("  - {}", name);
                }
            }
        }

        Commands::Run {
            map: path,
            port,
            group,
            namespace,
            interval,
        } => {
            let midi_map = map::load_file(&path)?;

            let midi = MidiCcSender::connect(port.as_deref())?;
            let mut bridge =
                Bridge::new(Box::new(midi), Box::new(LogPubSub)).with_namespace(namespace);
            bridge.install(midi_map)?;
            bridge.subscribe_config()?;

            if !bridge.select_group(&group) {
                println!(
                    "Group '{}' not in map; keeping '{}'",
                    group,
                    bridge.selected_group()
                );
            }

            println!(
                "Broadcasting {} parameters for group '{}' every {} ms. Ctrl-C to stop.",
                bridge.registry().len(),
                bridge.selected_group(),
                interval
            );

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let mut ticker = tokio::time::interval(Duration::from_millis(interval));
                let ctrl_c = tokio::signal::ctrl_c();
                tokio::pin!(ctrl_c);

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            bridge.broadcast_all();
                        }
                        _ = &mut ctrl_c => {
                            break;
                        }
                    }
                }
            });

            println!(
                "\nStopped. {} sink failures recorded.",
                bridge.sink_failures()
            );
        }

        Commands::Init => {
            let example_map = include_str!("../midimap.example.json");

            let path = "midimap.json";
            if std::path::Path::new(path).exists() {
                println!("midimap.json already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_map)?;
                println!("Created midimap.json with the default mapping.");
            }
        }
    }

    Ok(())
}
