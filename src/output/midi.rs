//! MIDI control-change output
//!
//! Wraps a midir output connection in a dedicated sender thread so the
//! bridge never blocks on the OS MIDI driver.

use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::{anyhow, Result};
use midir::MidiOutput;

use super::CcSink;

/// A control-change message: channel (1-16), controller (0-127), value (0-127)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcMessage {
    pub channel: u8,
    pub controller: u8,
    pub value: u8,
}

impl CcMessage {
    /// Raw MIDI bytes (status 0xB0 | zero-based channel)
    pub fn to_bytes(self) -> [u8; 3] {
        [
            0xB0 | (self.channel.saturating_sub(1) & 0x0F),
            self.controller & 0x7F,
            self.value & 0x7F,
        ]
    }
}

enum Command {
    Send(CcMessage),
    Stop,
}

/// MIDI output port wrapper implementing [`CcSink`]
pub struct MidiCcSender {
    sender: Sender<Command>,
}

impl MidiCcSender {
    /// Connect to the named port (substring match), or the first available
    /// port when `None`.
    pub fn connect(port_name: Option<&str>) -> Result<Self> {
        let midi_out = MidiOutput::new("dmxbridge")?;
        let ports = midi_out.ports();

        if ports.is_empty() {
            return Err(anyhow!("No MIDI output ports available"));
        }

        let port = if let Some(name) = port_name {
            ports
                .iter()
                .find(|p| {
                    midi_out
                        .port_name(p)
                        .map(|n| n.contains(name))
                        .unwrap_or(false)
                })
                .ok_or_else(|| anyhow!("MIDI port '{}' not found", name))?
                .clone()
        } else {
            ports[0].clone()
        };

        let port_name_actual = midi_out.port_name(&port)?;
        let conn = midi_out
            .connect(&port, "dmxbridge-output")
            .map_err(|e| anyhow!("failed to connect MIDI output: {e}"))?;

        let (sender, receiver) = mpsc::channel::<Command>();

        thread::spawn(move || {
            let mut conn = conn;
            while let Ok(cmd) = receiver.recv() {
                match cmd {
                    Command::Send(msg) => {
                        let _ = conn.send(&msg.to_bytes());
                    }
                    Command::Stop => break,
                }
            }
        });

        tracing::info!(port = %port_name_actual, "MIDI output connected");

        Ok(Self { sender })
    }

    /// Stop the sender thread
    pub fn stop(&self) {
        let _ = self.sender.send(Command::Stop);
    }
}

impl CcSink for MidiCcSender {
    fn send_cc(&mut self, channel: u8, controller: u8, value: u8) -> Result<()> {
        self.sender.send(Command::Send(CcMessage {
            channel,
            controller,
            value,
        }))?;
        Ok(())
    }
}

impl Drop for MidiCcSender {
    fn drop(&mut self) {
        self.stop();
    }
}

/// List available MIDI output ports
pub fn list_ports() -> Result<Vec<String>> {
    let midi_out = MidiOutput::new("dmxbridge-list")?;
    let ports = midi_out.ports();

    let names: Vec<String> = ports
        .iter()
        .filter_map(|p| midi_out.port_name(p).ok())
        .collect();

    Ok(names)
}
