//! Outbound commands: named function calls on the renderer's script object.
//!
//! DESIGN
//! ======
//! A command is a function path (`mapComponent.vectorLayerManager.addLayer`)
//! plus positional arguments already encoded as JSON values. Commands that
//! expect a reply carry the correlation token as their last argument.
//! Embedders that evaluate script text use [`Command::script`]; embedders
//! with a message channel can send the serialized `{function, args}` object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BridgeConfig;
use crate::geo::{Coordinates, Rectangle};
use crate::layer::GeoJsonLayerDescriptor;
use crate::transaction::EntityTransaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub function: String,
    pub args: Vec<Value>,
    /// Correlation token, also appended as the last argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Command {
    pub fn new(function: impl Into<String>, args: Vec<Value>) -> Self {
        Self { function: function.into(), args, token: None }
    }

    /// A command expecting a reply under `token`.
    pub fn with_token(function: impl Into<String>, mut args: Vec<Value>, token: &str) -> Self {
        args.push(Value::from(token));
        Self { function: function.into(), args, token: Some(token.to_owned()) }
    }

    /// Script text calling the function: `path(arg0, arg1);`.
    #[must_use]
    pub fn script(&self) -> String {
        let args: Vec<String> = self.args.iter().map(Value::to_string).collect();
        format!("{}({});", self.function, args.join(", "))
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.script())
    }
}

// =============================================================================
// ENCODER
// =============================================================================

/// Builds commands against the configured object paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEncoder {
    focus_on: String,
    get_view_extent: String,
    add_layer: String,
    remove_layer: String,
    commit_transaction: String,
}

impl CommandEncoder {
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        let root = &config.root_object;
        let layers = format!("{root}.{}", config.layer_manager);
        let entities = format!("{root}.{}", config.entity_manager);
        Self {
            focus_on: format!("{root}.focusOn"),
            get_view_extent: format!("{root}.getViewExtent"),
            add_layer: format!("{layers}.addLayer"),
            remove_layer: format!("{layers}.removeLayer"),
            commit_transaction: format!("{entities}.commitTransaction"),
        }
    }

    /// # Errors
    ///
    /// Returns the serializer error if the location cannot be encoded.
    pub fn focus_on_location(&self, location: &Coordinates) -> Result<Command, serde_json::Error> {
        Ok(Command::new(&self.focus_on, vec![serde_json::to_value(location)?]))
    }

    /// # Errors
    ///
    /// Returns the serializer error if the extent cannot be encoded.
    pub fn focus_on_extent(&self, extent: &Rectangle) -> Result<Command, serde_json::Error> {
        Ok(Command::new(&self.focus_on, vec![serde_json::to_value(extent)?]))
    }

    /// Focus on a loaded layer or entity by id.
    #[must_use]
    pub fn focus_on_id(&self, id: &str) -> Command {
        Command::new(&self.focus_on, vec![Value::from(id)])
    }

    #[must_use]
    pub fn get_view_extent(&self, token: &str) -> Command {
        Command::with_token(&self.get_view_extent, Vec::new(), token)
    }

    /// # Errors
    ///
    /// Returns the serializer error if the descriptor cannot be encoded.
    pub fn add_layer(&self, descriptor: &GeoJsonLayerDescriptor, token: &str) -> Result<Command, serde_json::Error> {
        Ok(Command::with_token(&self.add_layer, vec![serde_json::to_value(descriptor)?], token))
    }

    #[must_use]
    pub fn remove_layer(&self, layer_id: &str, token: &str) -> Command {
        Command::with_token(&self.remove_layer, vec![Value::from(layer_id)], token)
    }

    /// # Errors
    ///
    /// Returns the serializer error if the transaction cannot be encoded.
    pub fn commit_transaction(&self, tx: &EntityTransaction, token: &str) -> Result<Command, serde_json::Error> {
        Ok(Command::with_token(&self.commit_transaction, vec![serde_json::to_value(tx)?], token))
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new(&BridgeConfig::default())
    }
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
