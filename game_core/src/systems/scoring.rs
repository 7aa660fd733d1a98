use crate::{Events, Score, Side};

/// Award the point to `winner` and flag it for this tick
pub fn award_point(score: &mut Score, events: &mut Events, winner: Side) {
    score.award(winner);
    events.scored = Some(winner);
}
