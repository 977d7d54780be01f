use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::vocabulary::WordId;
use crate::error::{MarkovError, Result};

/// Outgoing edges of one word in the transition graph.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during ingestion
/// - Pick the next word using weighted random sampling
///
/// ## Invariants
/// - Each transition weight is strictly positive
/// - The sum of all weights fits in a `u64`
/// - Weights only ever grow
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct State {
	/// Outgoing transitions indexed by destination word.
	/// Example: { 4 => 42, 7 => 3 }
	transitions: HashMap<WordId, u64>,
}

impl State {
	/// Creates a state without outgoing edges.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of the transition toward `next`.
	pub fn add_transition(&mut self, next: WordId) -> Result<()> {
		self.add_weight(next, 1)
	}

	/// Adds `weight` occurrences of the transition toward `next`.
	///
	/// A zero weight leaves the state untouched.
	///
	/// # Errors
	/// `CorruptData` if the total outgoing weight would overflow; the state
	/// is left unchanged.
	pub fn add_weight(&mut self, next: WordId, weight: u64) -> Result<()> {
		if weight == 0 {
			return Ok(());
		}
		self.checked_total()
			.and_then(|total| total.checked_add(weight))
			.ok_or_else(|| MarkovError::corrupt(format!("total weight overflows when adding {weight} toward {next}")))?;
		*self.transitions.entry(next).or_insert(0) += weight;
		Ok(())
	}

	/// Weight of the edge toward `next` (0 when absent).
	pub fn weight(&self, next: WordId) -> u64 {
		self.transitions.get(&next).copied().unwrap_or(0)
	}

	/// Sum of every outgoing weight, `None` if it does not fit in a `u64`.
	pub fn checked_total(&self) -> Option<u64> {
		self.transitions.values().try_fold(0u64, |total, weight| total.checked_add(*weight))
	}

	/// Sum of every outgoing weight, saturating at `u64::MAX`.
	pub fn total(&self) -> u64 {
		self.checked_total().unwrap_or(u64::MAX)
	}

	/// Number of distinct destinations.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Iterates over `(destination, weight)` pairs in no particular order.
	pub fn transitions(&self) -> impl Iterator<Item = (WordId, u64)> + '_ {
		self.transitions.iter().map(|(next, weight)| (*next, *weight))
	}

	/// Picks the next word using weighted random sampling.
	///
	/// Draws `r` uniformly from `1..=total` and returns the first destination
	/// whose running weight reaches `r`. The probability of each destination
	/// is `weight / total` whatever the enumeration order of the map.
	///
	/// Returns `None` if the state has no transitions or its total
	/// weight overflows.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<WordId> {
		let total = self.checked_total()?;
		if total == 0 {
			return None;
		}

		let draw = rng.random_range(1..=total);
		let mut running = 0;
		for (next, weight) in &self.transitions {
			running += weight;
			if running >= draw {
				return Some(*next);
			}
		}

		// Unreachable: the running sum ends at `total >= draw`.
		None
	}
}
