use crate::components::Side;
use crate::params::Params;

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u8,  // AI paddle
    pub right: u8, // Trainer paddle
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award a point; counters wrap back to 0 past 99
    pub fn award(&mut self, side: Side) {
        let counter = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *counter = if *counter >= Params::SCORE_WRAP {
            0
        } else {
            *counter + 1
        };
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// How the trainer paddle's target is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    /// Track the ball with a per-rally aiming offset
    Auto,
    /// Follow an externally supplied pointer Y
    Pointer,
}

/// Per-tick input for the trainer paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerInput {
    pub mode: TargetMode,
    pub pointer_y: i32, // Ignored in auto mode
}

impl TrainerInput {
    pub fn auto() -> Self {
        Self {
            mode: TargetMode::Auto,
            pointer_y: 0,
        }
    }

    pub fn pointer(y: i32) -> Self {
        Self {
            mode: TargetMode::Pointer,
            pointer_y: y,
        }
    }
}

impl Default for TrainerInput {
    fn default() -> Self {
        Self::auto()
    }
}

/// What happened to the open sample at the AI goal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Added,
    Duplicate,
    DeadZone,
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub reached_line: Option<Side>,
    pub ball_hit_wall: bool,
    pub paddle_hit: Option<Side>,
    pub scored: Option<Side>, // Side that won the point
    pub sample_opened: bool,
    pub sample_outcome: Option<SampleOutcome>,
    pub trained_passes: usize,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_award_left() {
        let mut score = Score::new();
        assert_eq!(score.left, 0);
        score.award(Side::Left);
        assert_eq!(score.left, 1);
        score.award(Side::Left);
        assert_eq!(score.left, 2);
        assert_eq!(score.right, 0);
    }

    #[test]
    fn test_score_award_right() {
        let mut score = Score::new();
        score.award(Side::Right);
        assert_eq!(score.right, 1);
        assert_eq!(score.left, 0);
    }

    #[test]
    fn test_score_wraps_past_99() {
        let mut score = Score::new();
        for _ in 0..99 {
            score.award(Side::Right);
        }
        assert_eq!(score.right, 99);
        score.award(Side::Right);
        assert_eq!(score.right, 0, "Scoreboard only has two digits");
    }

    #[test]
    fn test_events_clear() {
        let mut events = Events::new();
        events.reached_line = Some(Side::Left);
        events.ball_hit_wall = true;
        events.paddle_hit = Some(Side::Right);
        events.scored = Some(Side::Left);
        events.sample_opened = true;
        events.sample_outcome = Some(SampleOutcome::Added);
        events.trained_passes = 3;

        events.clear();

        assert_eq!(events.reached_line, None);
        assert!(!events.ball_hit_wall);
        assert_eq!(events.paddle_hit, None);
        assert_eq!(events.scored, None);
        assert!(!events.sample_opened);
        assert_eq!(events.sample_outcome, None);
        assert_eq!(events.trained_passes, 0);
    }

    #[test]
    fn test_trainer_input_defaults_to_auto() {
        assert_eq!(TrainerInput::default().mode, TargetMode::Auto);
        assert_eq!(TrainerInput::pointer(120).pointer_y, 120);
    }
}
