//! Outbound sink contracts
//!
//! The bridge fans values out through these traits; transport internals
//! (MIDI drivers, broker connections) live behind them.

use anyhow::Result;

/// Receives MIDI control-change messages
pub trait CcSink {
    /// Send one control change. Channel 1-16, controller and value 0-127.
    fn send_cc(&mut self, channel: u8, controller: u8, value: u8) -> Result<()>;
}

/// Publish/subscribe transport boundary
pub trait PubSubSink {
    /// Point-in-time connection state; publishing is skipped when false
    fn is_connected(&self) -> bool;

    /// Publish a payload to a topic
    fn publish(&mut self, topic: &str, payload: &str) -> Result<()>;

    /// Subscribe to a topic
    fn subscribe(&mut self, topic: &str) -> Result<()>;
}

/// Stand-in pub/sub sink that writes publishes to the log
#[derive(Debug, Default)]
pub struct LogPubSub;

impl PubSubSink for LogPubSub {
    fn is_connected(&self) -> bool {
        true
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<()> {
        tracing::info!(%topic, %payload, "publish");
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<()> {
        tracing::info!(%topic, "subscribe");
        Ok(())
    }
}

/// Pub/sub sink that is never connected; publishes are skipped entirely
#[derive(Debug, Default)]
pub struct NullPubSub;

impl PubSubSink for NullPubSub {
    fn is_connected(&self) -> bool {
        false
    }

    fn publish(&mut self, _topic: &str, _payload: &str) -> Result<()> {
        Ok(())
    }

    fn subscribe(&mut self, _topic: &str) -> Result<()> {
        Ok(())
    }
}
