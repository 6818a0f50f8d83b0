//! Batched entity mutations committed to the renderer as one command.

use serde::Serialize;

use crate::editor::{Editor, StyleEditor};
use crate::entity::Entity;
use crate::error::BridgeError;

/// Receives whether the renderer applied a committed transaction.
pub type CommitCallback = Box<dyn FnOnce(bool) + Send + 'static>;

/// Removals and style edits collected for a single commit.
///
/// Removals keep insertion order and ignore duplicates. Edits are kept in
/// the order they were added; two edits for the same entity are both sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityTransaction {
    #[serde(rename = "removed")]
    removals: Vec<String>,
    #[serde(rename = "editors")]
    edits: Vec<Editor>,
}

impl EntityTransaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove(&mut self, entity: &Entity) -> &mut Self {
        self.remove_id(entity.id())
    }

    pub fn remove_id(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.removals.contains(&id) {
            self.removals.push(id);
        }
        self
    }

    pub fn change_style(&mut self, editor: impl Into<Editor>) -> &mut Self {
        self.edits.push(editor.into());
        self
    }

    #[must_use]
    pub fn removals(&self) -> &[String] {
        &self.removals
    }

    #[must_use]
    pub fn edits(&self) -> &[Editor] {
        &self.edits
    }

    /// Ids touched by an edit, in edit order.
    pub fn edited_ids(&self) -> impl Iterator<Item = &str> {
        self.edits.iter().map(StyleEditor::id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.edits.is_empty()
    }
}

/// Entry point for reading loaded entities and committing changes to them.
pub trait EntityManager {
    fn begin_transaction(&self) -> EntityTransaction {
        EntityTransaction::new()
    }

    /// The loaded entity with `id`, if any.
    fn entity(&self, id: &str) -> Option<std::sync::Arc<Entity>>;

    /// Commit `tx`. `callback`, if any, receives `true` once the renderer
    /// applied it.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError` if the commit could not be sent.
    fn commit_transaction(&self, tx: EntityTransaction, callback: Option<CommitCallback>) -> Result<(), BridgeError>;
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
