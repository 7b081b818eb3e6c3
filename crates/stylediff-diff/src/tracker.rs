//! Simulated layer order used while emitting layer commands.

use crate::error::{DiffError, DiffResult};

/// Layer ids in the order a renderer would hold them after every command
/// emitted so far has been applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerTracker<'a> {
    ids: Vec<&'a str>,
}

impl<'a> LayerTracker<'a> {
    pub fn new(ids: Vec<&'a str>) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.ids.get(index).copied()
    }

    /// The id `offset` slots from the top (`0` is the last layer).
    pub fn from_top(&self, offset: usize) -> Option<&'a str> {
        self.ids
            .len()
            .checked_sub(offset + 1)
            .and_then(|index| self.get(index))
    }

    /// First position of `id` at or after `start`.
    pub fn position_from(&self, id: &str, start: usize) -> Option<usize> {
        self.ids
            .iter()
            .skip(start)
            .position(|candidate| *candidate == id)
            .map(|offset| start + offset)
    }

    /// Last position of `id` at or before `end`.
    pub fn last_position_through(&self, id: &str, end: usize) -> Option<usize> {
        let stop = end.saturating_add(1).min(self.ids.len());
        self.ids[..stop].iter().rposition(|candidate| *candidate == id)
    }

    /// Last position of `id` anywhere.
    pub fn last_position(&self, id: &str) -> Option<usize> {
        self.ids.iter().rposition(|candidate| *candidate == id)
    }

    pub fn remove_at(&mut self, index: usize) -> DiffResult<&'a str> {
        if index >= self.ids.len() {
            return Err(DiffError::TrackerDesync(format!("remove at {index}")));
        }
        Ok(self.ids.remove(index))
    }

    pub fn insert_at(&mut self, index: usize, id: &'a str) -> DiffResult<()> {
        if index > self.ids.len() {
            return Err(DiffError::TrackerDesync(format!("insert {id} at {index}")));
        }
        self.ids.insert(index, id);
        Ok(())
    }

    /// Current order.
    pub fn ids(&self) -> &[&'a str] {
        &self.ids
    }
}
