use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use crate::models::{Block, IdGenerator, ShortIdGenerator};

/// Number of previous sequences kept for [`Document::undo`].
const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate block id `{0}`")]
    DuplicateId(String),
}

/// The seam between the editing core and whatever persists the blocks.
///
/// Every mutation the editor performs goes through [`BlockStore::apply_blocks`]
/// as a pure `previous -> next` transition, so an implementation can diff,
/// batch, persist or record them.
pub trait BlockStore {
    fn blocks(&self) -> &[Block];

    /// Bumped on every applied transition.
    fn version(&self) -> u64;

    /// Replace the sequence with `updater(previous)`.
    ///
    /// Returns whether the sequence changed.
    fn apply_blocks<F>(&mut self, updater: F) -> bool
    where
        F: FnOnce(&[Block]) -> Vec<Block>;
}

/// In-memory block document with a version counter and undo history.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    version: u64,
    history: VecDeque<Vec<Block>>,
}

impl Document {
    /// Create a document. An empty sequence is seeded with one blank paragraph.
    pub fn new(blocks: Vec<Block>) -> Self {
        let blocks = if blocks.is_empty() {
            vec![Block::paragraph(ShortIdGenerator::default().next_id(), "")]
        } else {
            blocks
        };
        Self {
            blocks,
            version: 0,
            history: VecDeque::new(),
        }
    }

    /// Load a JSON array of blocks, rejecting duplicate ids.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let blocks: Vec<Block> = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for block in &blocks {
            if !seen.insert(block.id.as_str()) {
                return Err(DocumentError::DuplicateId(block.id.clone()));
            }
        }
        Ok(Self::new(blocks))
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.blocks)?)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Restore the sequence before the last applied transition.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(previous) => {
                self.blocks = previous;
                self.version += 1;
                log::debug!("undo -> version {}", self.version);
                true
            }
            None => false,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl BlockStore for Document {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply_blocks<F>(&mut self, updater: F) -> bool
    where
        F: FnOnce(&[Block]) -> Vec<Block>,
    {
        let next = updater(&self.blocks);
        if next.is_empty() {
            log::warn!("refusing transition that would leave the document empty");
            return false;
        }
        if next == self.blocks {
            return false;
        }
        let previous = std::mem::replace(&mut self.blocks, next);
        self.history.push_back(previous);
        if self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.version += 1;
        log::debug!(
            "applied block transition -> version {} ({} blocks)",
            self.version,
            self.blocks.len()
        );
        true
    }
}
