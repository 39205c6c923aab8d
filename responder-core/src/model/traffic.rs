//! Live traffic multipliers
//!
//! Every external edge id owns one slot holding its current multiplier as the
//! bit pattern of an `f64` inside an `AtomicU64`. A feed update is a single
//! atomic store, so a reader sees either the old or the new value of an edge,
//! never a mix. Different edges may be observed at different generations by
//! the same query.

use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;

use crate::Error;

pub const FREE_FLOW: f64 = 1.0;

#[derive(Debug)]
pub struct TrafficTable {
    slots: Vec<AtomicU64>,
    slot_lookup: HashMap<String, usize>,
}

impl TrafficTable {
    /// Builds the table from `(edge id, initial multiplier)` pairs in slot order
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids or invalid multipliers
    pub fn new<I>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut slots = Vec::new();
        let mut slot_lookup = HashMap::new();

        for (id, multiplier) in entries {
            validate_multiplier(multiplier)?;
            if slot_lookup.insert(id.clone(), slots.len()).is_some() {
                return Err(Error::InvalidData(format!("Duplicate edge id: {id}")));
            }
            slots.push(AtomicU64::new(multiplier.to_bits()));
        }

        Ok(Self { slots, slot_lookup })
    }

    /// Replaces the multiplier of one edge, returning the previous value
    ///
    /// # Errors
    ///
    /// [`Error::UnknownEdge`] if no such edge was loaded,
    /// [`Error::InvalidMultiplier`] if the value is below 1.0 or not finite
    pub fn update_edge(&self, edge_id: &str, multiplier: f64) -> Result<f64, Error> {
        validate_multiplier(multiplier)?;
        let slot = self
            .slot(edge_id)
            .ok_or_else(|| Error::UnknownEdge(edge_id.to_string()))?;

        let previous = self.slots[slot].swap(multiplier.to_bits(), Ordering::Relaxed);
        log::trace!("Traffic multiplier of {edge_id} changed to {multiplier}");
        Ok(f64::from_bits(previous))
    }

    /// Current multiplier of a slot; unknown slots read as free flow
    pub fn multiplier(&self, slot: usize) -> f64 {
        self.slots
            .get(slot)
            .map_or(FREE_FLOW, |value| f64::from_bits(value.load(Ordering::Relaxed)))
    }

    pub fn multiplier_of(&self, edge_id: &str) -> Option<f64> {
        self.slot(edge_id).map(|slot| self.multiplier(slot))
    }

    pub fn slot(&self, edge_id: &str) -> Option<usize> {
        self.slot_lookup.get(edge_id).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

pub(crate) fn validate_multiplier(multiplier: f64) -> Result<(), Error> {
    if multiplier.is_finite() && multiplier >= FREE_FLOW {
        Ok(())
    } else {
        Err(Error::InvalidMultiplier(multiplier))
    }
}

/// Multipliers as seen by one query.
///
/// Each slot is read from the shared table at most once and memoised, so
/// repeated relaxations of the same edge within a query use the same weight.
#[derive(Debug)]
pub(crate) struct WeightSnapshot<'a> {
    table: &'a TrafficTable,
    seen: HashMap<usize, f64>,
}

impl<'a> WeightSnapshot<'a> {
    pub(crate) fn new(table: &'a TrafficTable) -> Self {
        Self {
            table,
            seen: HashMap::new(),
        }
    }

    pub(crate) fn multiplier(&mut self, slot: usize) -> f64 {
        let table = self.table;
        *self
            .seen
            .entry(slot)
            .or_insert_with(|| table.multiplier(slot))
    }
}
