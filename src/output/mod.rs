//! Outbound sinks: MIDI control-change and pub/sub

mod midi;
mod sink;

pub use midi::{list_ports, CcMessage, MidiCcSender};
pub use sink::{CcSink, LogPubSub, NullPubSub, PubSubSink};
