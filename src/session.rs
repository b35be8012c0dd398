//! Per-session participant state.
//!
//! A session is created for one planning interaction, mutated by that
//! interaction only, and dropped (or [`Session::reset`]) when it ends.

use crate::geo::Coordinate;
use crate::places::Place;
use crate::recommend::{RecommendError, Strategy};
use crate::vibe::Vibe;
use serde::Serialize;

/// Fewest participants a recommendation makes sense for.
pub const MIN_PARTICIPANTS: usize = 2;
/// Slots a fresh session starts with.
pub const DEFAULT_PARTICIPANTS: usize = 3;

/// One person's starting point. Resolved once `location` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub index: usize,
    pub name: Option<String>,
    pub location: Option<Coordinate>,
}

impl Participant {
    fn empty(index: usize) -> Self {
        Self { index, name: None, location: None }
    }

    pub fn is_resolved(&self) -> bool {
        self.location.is_some()
    }

    /// "친구 1" when no place has been picked yet.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("친구 {}", self.index + 1))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    participants: Vec<Participant>,
    pub strategy: Strategy,
    pub vibe: Vibe,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICIPANTS)
    }
}

impl Session {
    pub fn new(slots: usize) -> Self {
        Self {
            participants: (0..slots).map(Participant::empty).collect(),
            strategy: Strategy::default(),
            vibe: Vibe::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_vibe(mut self, vibe: Vibe) -> Self {
        self.vibe = vibe;
        self
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Append an empty slot and return its index.
    pub fn add_participant(&mut self) -> usize {
        let index = self.participants.len();
        self.participants.push(Participant::empty(index));
        index
    }

    /// Confirm a search result as a participant's starting point.
    pub fn select(&mut self, index: usize, place: &Place) -> Result<(), RecommendError> {
        self.set_location(index, Some(place.name.clone()), place.coordinate)
    }

    pub fn set_location(
        &mut self,
        index: usize,
        name: Option<String>,
        location: Coordinate,
    ) -> Result<(), RecommendError> {
        if !location.is_valid() {
            return Err(RecommendError::InvalidCoordinate(index));
        }
        let slot = self
            .participants
            .get_mut(index)
            .ok_or(RecommendError::NoSuchParticipant(index))?;
        slot.name = name;
        slot.location = Some(location);
        Ok(())
    }

    /// Forget one participant's selection.
    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.participants.get_mut(index) {
            *slot = Participant::empty(index);
        }
    }

    /// Drop every selection, keeping the slot count and preferences.
    pub fn reset(&mut self) {
        for (index, slot) in self.participants.iter_mut().enumerate() {
            *slot = Participant::empty(index);
        }
    }

    /// Every participant's coordinate, in slot order.
    ///
    /// Fails when there are too few slots or any slot is unresolved.
    pub fn resolved_coordinates(&self) -> Result<Vec<Coordinate>, RecommendError> {
        if self.participants.len() < MIN_PARTICIPANTS {
            return Err(RecommendError::TooFewParticipants(self.participants.len()));
        }
        self.participants
            .iter()
            .map(|p| p.location.ok_or(RecommendError::Unresolved(p.index)))
            .collect()
    }
}
