//! Fixtures shared by unit tests.

use std::sync::{Arc, Mutex, OnceLock};

use crate::bridge::{Dispatcher, MapBridge, Renderer};
use crate::command::Command;
use crate::config::BridgeConfig;
use crate::entity::Entity;

/// Renderer that records every command it is asked to evaluate.
#[derive(Default)]
pub struct RecordingRenderer {
    commands: Mutex<Vec<Command>>,
}

impl RecordingRenderer {
    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Command> {
        self.commands.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.commands.lock().unwrap().len()
    }
}

impl Renderer for RecordingRenderer {
    fn evaluate(&self, command: &Command) {
        self.commands.lock().unwrap().push(command.clone());
    }
}

/// Renderer that answers every token-carrying command synchronously with a
/// canned reply for its function name. Commands without a reply are ignored.
pub struct AutoReplyRenderer {
    bridge: OnceLock<MapBridge>,
    replies: Vec<(&'static str, Option<String>)>,
}

impl AutoReplyRenderer {
    pub fn new(replies: Vec<(&'static str, Option<String>)>) -> Arc<Self> {
        Arc::new(Self { bridge: OnceLock::new(), replies })
    }
}

impl Renderer for AutoReplyRenderer {
    fn evaluate(&self, command: &Command) {
        let (Some(bridge), Some(token)) = (self.bridge.get(), command.token()) else {
            return;
        };
        let reply = self
            .replies
            .iter()
            .find(|(suffix, _)| command.function.ends_with(suffix))
            .and_then(|(_, reply)| reply.clone());
        bridge.invoke_callback(token, reply);
    }
}

/// Bridge over a fresh `RecordingRenderer` with default config.
pub fn recording_bridge() -> (MapBridge, Dispatcher, Arc<RecordingRenderer>) {
    recording_bridge_with(BridgeConfig::default())
}

pub fn recording_bridge_with(config: BridgeConfig) -> (MapBridge, Dispatcher, Arc<RecordingRenderer>) {
    let renderer = Arc::new(RecordingRenderer::default());
    let (bridge, dispatcher) = MapBridge::new(renderer.clone(), config);
    (bridge, dispatcher, renderer)
}

/// Bridge whose renderer replies immediately from `replies`.
pub fn auto_reply_bridge(replies: Vec<(&'static str, Option<String>)>) -> (MapBridge, Dispatcher) {
    let renderer = AutoReplyRenderer::new(replies);
    let (bridge, dispatcher) = MapBridge::new(renderer.clone(), BridgeConfig::default());
    let _ = renderer.bridge.set(bridge.clone());
    (bridge, dispatcher)
}

pub fn sample_point(id: &str) -> Entity {
    Entity::from_json(&format!(
        r#"{{"type":"point","id":"{id}","isVisible":true,"location":{{"lon":34.8155,"lat":31.9584,"alt":0}}}}"#
    ))
    .unwrap()
}

pub fn sample_line(id: &str) -> Entity {
    Entity::from_json(&format!(
        r#"{{"type":"line","id":"{id}","isVisible":true,"path":[{{"lon":34.81,"lat":31.95,"alt":0}},{{"lon":34.82,"lat":31.96,"alt":0}}]}}"#
    ))
    .unwrap()
}

/// Load reply for a layer holding one point per id.
pub fn layer_reply(layer_id: &str, point_ids: &[&str]) -> String {
    let entities: Vec<String> = point_ids
        .iter()
        .map(|id| {
            format!(r#"{{"type":"point","id":"{id}","isVisible":true,"location":{{"lon":1,"lat":2,"alt":0}}}}"#)
        })
        .collect();
    format!(r#"{{"id":"{layer_id}","entities":[{}],"isVisible":true}}"#, entities.join(","))
}
