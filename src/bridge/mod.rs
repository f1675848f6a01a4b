//! The bridge: owned mapping state plus outbound fan-out
//!
//! One `Bridge` owns the live MIDI map, the parameter registry, and the
//! group selection as a single unit, and fans every value change out to a
//! control-change sink and a pub/sub sink. All mutation goes through one
//! owner; callers on other threads must marshal onto it.

use thiserror::Error;
use tracing::{debug, warn};

use crate::map::{self, DecodeError, MidiMap};
use crate::output::{CcSink, PubSubSink};
use crate::params::{ParameterRegistry, RegistryError};
use crate::resolve::resolve;

/// Default interval between full re-broadcasts, in milliseconds
pub const BROADCAST_INTERVAL_MS: u64 = 5000;

/// Well-known topic carrying replacement MIDI map documents
pub const MAP_CONFIG_TOPIC: &str = "config/midi_map";

/// Default topic namespace for published values
pub const DEFAULT_NAMESPACE: &str = "dmx";

/// Errors from loading a map payload into the bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The dynamic parameter re-binding engine.
///
/// Starts with the stock map installed and group "0" selected.
pub struct Bridge {
    map: MidiMap,
    registry: ParameterRegistry,
    selected_group: String,
    namespace: String,
    cc_sink: Box<dyn CcSink>,
    pubsub: Box<dyn PubSubSink>,
    sink_failures: u64,
}

impl Bridge {
    /// Create a bridge over the given sinks with the stock map installed
    pub fn new(cc_sink: Box<dyn CcSink>, pubsub: Box<dyn PubSubSink>) -> Self {
        let mut bridge = Self {
            map: MidiMap::new(),
            registry: ParameterRegistry::new(),
            selected_group: "0".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            cc_sink,
            pubsub,
            sink_failures: 0,
        };
        // The stock map is never empty, so this cannot fail
        let _ = bridge.install(MidiMap::default_map());
        bridge
    }

    /// Set the topic namespace for published values (builder pattern)
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Replace the live map and rebuild the parameter set. Atomic: on
    /// failure both the map and the registry keep their previous state.
    pub fn install(&mut self, map: MidiMap) -> Result<(), RegistryError> {
        self.registry.install(&map)?;
        self.map = map;
        Ok(())
    }

    /// Decode a raw JSON payload and install it
    pub fn install_text(&mut self, text: &str) -> Result<(), BridgeError> {
        let map = map::decode(text)?;
        self.install(map)?;
        Ok(())
    }

    /// Subscribe the pub/sub sink to the map configuration topic
    pub fn subscribe_config(&mut self) -> anyhow::Result<()> {
        self.pubsub.subscribe(MAP_CONFIG_TOPIC)
    }

    /// Handle an incoming pub/sub message. Payloads on the configuration
    /// topic are treated as replacement map documents; anything else is
    /// ignored.
    pub fn handle_message(&mut self, topic: &str, payload: &str) -> Result<(), BridgeError> {
        if topic != MAP_CONFIG_TOPIC {
            return Ok(());
        }
        self.install_text(payload)?;
        debug!("installed MIDI map from {}", MAP_CONFIG_TOPIC);
        Ok(())
    }

    /// The live map
    pub fn map(&self) -> &MidiMap {
        &self.map
    }

    /// The live parameter registry
    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    /// Select the active group. Returns whether the change was applied;
    /// unknown ids leave the previous selection in place.
    pub fn select_group(&mut self, group_id: &str) -> bool {
        if self.map.has_group(group_id) {
            self.selected_group = group_id.to_string();
            true
        } else {
            false
        }
    }

    /// The currently selected group id
    pub fn selected_group(&self) -> &str {
        &self.selected_group
    }

    /// Set a parameter value (clamped into its range) and fan it out.
    /// Returns the stored value.
    pub fn set_value(&mut self, id: &str, value: f64) -> Result<f64, RegistryError> {
        let stored = self.registry.set(id, value)?;
        self.emit(id);
        Ok(stored)
    }

    /// Read a parameter's current value
    pub fn value(&self, id: &str) -> Option<f64> {
        self.registry.get(id)
    }

    /// Re-emit every parameter at its current value, in registry order.
    /// Each parameter is emitted fully before the next; sink failures are
    /// recorded and iteration continues.
    pub fn broadcast_all(&mut self) {
        let ids: Vec<String> = self.registry.ids().iter().map(|s| s.to_string()).collect();
        for id in ids {
            self.emit(&id);
        }
    }

    /// Count of sink send/publish failures absorbed so far
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures
    }

    /// Emit one parameter's current value to both sinks.
    ///
    /// Skips silently when the selected group is not in the live map or
    /// when no attribute resolves for the parameter. Sink failures are
    /// counted and logged, never propagated.
    fn emit(&mut self, id: &str) {
        if !self.map.has_group(&self.selected_group) {
            return;
        }

        let Some(value) = self.registry.get(id) else {
            return;
        };
        let Some(spec) = self.registry.spec_of(id) else {
            return;
        };
        let Some((attribute_id, attribute_name)) = resolve(id, &self.map) else {
            return;
        };

        // Group id -> 1-based MIDI channel; non-numeric ids fall back to 0
        let channel = (self.selected_group.parse::<i64>().unwrap_or(0) + 1).clamp(1, 16) as u8;
        let controller = attribute_id.parse::<i64>().unwrap_or(0).clamp(0, 127) as u8;
        let cc_value = ((spec.normalize(value) * 127.0).round() as i64).clamp(0, 127) as u8;

        if let Err(e) = self.cc_sink.send_cc(channel, controller, cc_value) {
            self.sink_failures += 1;
            warn!(parameter = id, error = %e, "control-change send failed");
        }

        if self.pubsub.is_connected() {
            let group_name = self.map.group_name(&self.selected_group).unwrap_or("");
            let topic = format!("{}/{}/{}", self.namespace, group_name, attribute_name);
            let payload = format!("{value:.2}");

            if let Err(e) = self.pubsub.publish(&topic, &payload) {
                self.sink_failures += 1;
                warn!(%topic, error = %e, "publish failed");
            }
        }

        debug!(parameter = id, channel, controller, cc_value, "fan-out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct TestCc {
        sent: Rc<RefCell<Vec<(u8, u8, u8)>>>,
        fail_on_call: Option<usize>,
        calls: usize,
    }

    impl TestCc {
        fn new() -> (Self, Rc<RefCell<Vec<(u8, u8, u8)>>>) {
            let sent = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    sent: Rc::clone(&sent),
                    fail_on_call: None,
                    calls: 0,
                },
                sent,
            )
        }
    }

    impl CcSink for TestCc {
        fn send_cc(&mut self, channel: u8, controller: u8, value: u8) -> anyhow::Result<()> {
            self.calls += 1;
            if self.fail_on_call == Some(self.calls) {
                return Err(anyhow!("sink rejected message"));
            }
            self.sent.borrow_mut().push((channel, controller, value));
            Ok(())
        }
    }

    struct TestPubSub {
        connected: bool,
        published: Rc<RefCell<Vec<(String, String)>>>,
        subscribed: Rc<RefCell<Vec<String>>>,
    }

    impl TestPubSub {
        fn new(connected: bool) -> (Self, Rc<RefCell<Vec<(String, String)>>>) {
            let published = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    connected,
                    published: Rc::clone(&published),
                    subscribed: Rc::new(RefCell::new(Vec::new())),
                },
                published,
            )
        }
    }

    impl PubSubSink for TestPubSub {
        fn is_connected(&self) -> bool {
            self.connected
        }

        fn publish(&mut self, topic: &str, payload: &str) -> anyhow::Result<()> {
            self.published
                .borrow_mut()
                .push((topic.to_string(), payload.to_string()));
            Ok(())
        }

        fn subscribe(&mut self, topic: &str) -> anyhow::Result<()> {
            self.subscribed.borrow_mut().push(topic.to_string());
            Ok(())
        }
    }

    fn test_bridge(connected: bool) -> (Bridge, Rc<RefCell<Vec<(u8, u8, u8)>>>, Rc<RefCell<Vec<(String, String)>>>) {
        let (cc, sent) = TestCc::new();
        let (pubsub, published) = TestPubSub::new(connected);
        (
            Bridge::new(Box::new(cc), Box::new(pubsub)),
            sent,
            published,
        )
    }

    #[test]
    fn test_new_bridge_has_stock_map() {
        let (bridge, _, _) = test_bridge(false);

        assert_eq!(bridge.selected_group(), "0");
        assert_eq!(
            bridge.registry().ids(),
            vec!["hue", "saturation", "brightness"]
        );
        assert_eq!(bridge.value("saturation"), Some(100.0));
    }

    #[test]
    fn test_end_to_end_hue_change() {
        let (mut bridge, sent, published) = test_bridge(true);

        assert!(bridge.select_group("1"));
        bridge.set_value("hue", 180.0).unwrap();

        // 127 * 180 / 360 = 63.5, rounds to 64; group "1" is channel 2
        assert_eq!(*sent.borrow(), vec![(2, 1, 64)]);
        assert_eq!(
            *published.borrow(),
            vec![("dmx/Guitarist/Hue".to_string(), "180.00".to_string())]
        );
    }

    #[test]
    fn test_publish_skipped_when_disconnected() {
        let (mut bridge, sent, published) = test_bridge(false);

        bridge.set_value("hue", 180.0).unwrap();

        assert_eq!(sent.borrow().len(), 1);
        assert!(published.borrow().is_empty());
    }

    #[test]
    fn test_select_unknown_group_is_retained() {
        let (mut bridge, _, _) = test_bridge(false);

        assert!(!bridge.select_group("9"));
        assert_eq!(bridge.selected_group(), "0");
    }

    #[test]
    fn test_no_emission_when_selection_dangling() {
        let (mut bridge, sent, _) = test_bridge(false);

        // New map without group "0"; selection stays "0" and dangles
        bridge
            .install_text(r#"{"groups": {"5": "Side"}, "attributes": {"1": "Hue"}}"#)
            .unwrap();
        bridge.set_value("hue", 90.0).unwrap();
        assert!(sent.borrow().is_empty());

        // Value change after a valid selection emits again
        assert!(bridge.select_group("5"));
        bridge.set_value("hue", 90.0).unwrap();
        assert_eq!(*sent.borrow(), vec![(6, 1, 32)]);
    }

    #[test]
    fn test_set_value_clamps_before_emitting() {
        let (mut bridge, sent, published) = test_bridge(true);

        assert_eq!(bridge.set_value("hue", 500.0), Ok(360.0));

        assert_eq!(*sent.borrow(), vec![(1, 1, 127)]);
        assert_eq!(published.borrow()[0].1, "360.00");
    }

    #[test]
    fn test_set_unknown_parameter_has_no_side_effects() {
        let (mut bridge, sent, published) = test_bridge(true);

        assert_eq!(
            bridge.set_value("fog", 1.0),
            Err(RegistryError::ParameterNotFound("fog".to_string()))
        );
        assert!(sent.borrow().is_empty());
        assert!(published.borrow().is_empty());
    }

    #[test]
    fn test_broadcast_all_emits_in_registry_order() {
        let (mut bridge, sent, _) = test_bridge(false);

        bridge.broadcast_all();

        // hue defaults to 0, saturation and brightness to 100 (full scale)
        assert_eq!(*sent.borrow(), vec![(1, 1, 0), (1, 2, 127), (1, 3, 127)]);
    }

    #[test]
    fn test_broadcast_all_continues_after_sink_failure() {
        let (mut cc, sent) = TestCc::new();
        cc.fail_on_call = Some(2);
        let (pubsub, _) = TestPubSub::new(false);
        let mut bridge = Bridge::new(Box::new(cc), Box::new(pubsub));

        bridge.broadcast_all();

        // Second send rejected, first and third still went out
        assert_eq!(*sent.borrow(), vec![(1, 1, 0), (1, 3, 127)]);
        assert_eq!(bridge.sink_failures(), 1);
    }

    #[test]
    fn test_install_text_garbage_keeps_state() {
        let (mut bridge, _, _) = test_bridge(false);

        assert!(bridge.install_text("not json").is_err());
        assert!(bridge
            .install_text(r#"{"groups": {}, "attributes": {}}"#)
            .is_err());

        assert_eq!(
            bridge.registry().ids(),
            vec!["hue", "saturation", "brightness"]
        );
        assert_eq!(bridge.map().group_name("0"), Some("Vocalist"));
    }

    #[test]
    fn test_install_text_rebuilds_parameters() {
        let (mut bridge, _, _) = test_bridge(false);

        bridge
            .install_text(r#"{"groups": {"0": "Solo"}, "attributes": {"7": "Strobe Rate"}}"#)
            .unwrap();

        assert_eq!(bridge.registry().ids(), vec!["stroberate"]);
        let spec = bridge.registry().spec_of("stroberate").unwrap();
        assert_eq!(spec.max, 20.0);
        assert_eq!(spec.unit, "Hz");
    }

    #[test]
    fn test_handle_message_config_topic() {
        let (mut bridge, _, _) = test_bridge(false);

        bridge
            .handle_message(
                MAP_CONFIG_TOPIC,
                r#"{"groups": {"0": "Solo"}, "attributes": {"4": "Intensity"}}"#,
            )
            .unwrap();
        assert_eq!(bridge.registry().ids(), vec!["intensity"]);

        // Other topics are ignored
        bridge.handle_message("dmx/Solo/command", "whatever").unwrap();
        assert_eq!(bridge.registry().ids(), vec!["intensity"]);
    }

    #[test]
    fn test_non_numeric_group_id_falls_back_to_channel_1() {
        let (mut bridge, sent, _) = test_bridge(false);

        bridge
            .install_text(r#"{"groups": {"front": "Front"}, "attributes": {"1": "Hue"}}"#)
            .unwrap();
        assert!(bridge.select_group("front"));
        bridge.set_value("hue", 360.0).unwrap();

        assert_eq!(*sent.borrow(), vec![(1, 1, 127)]);
    }

    #[test]
    fn test_controller_number_clamped() {
        let (mut bridge, sent, _) = test_bridge(false);

        bridge
            .install_text(r#"{"groups": {"0": "Solo"}, "attributes": {"400": "Hue"}}"#)
            .unwrap();
        bridge.set_value("hue", 0.0).unwrap();

        assert_eq!(*sent.borrow(), vec![(1, 127, 0)]);
    }

    #[test]
    fn test_custom_namespace() {
        let (cc, _) = TestCc::new();
        let (pubsub, published) = TestPubSub::new(true);
        let mut bridge =
            Bridge::new(Box::new(cc), Box::new(pubsub)).with_namespace("stage");

        bridge.set_value("brightness", 50.0).unwrap();

        assert_eq!(published.borrow()[0].0, "stage/Vocalist/Brightness");
    }

    #[test]
    fn test_subscribe_config() {
        let (cc, _) = TestCc::new();
        let (pubsub, _) = TestPubSub::new(true);
        let subscribed = Rc::clone(&pubsub.subscribed);
        let mut bridge = Bridge::new(Box::new(cc), Box::new(pubsub));

        bridge.subscribe_config().unwrap();

        assert_eq!(*subscribed.borrow(), vec![MAP_CONFIG_TOPIC.to_string()]);
    }
}
