use crate::components::Side;
use crate::params::Params;
use crate::samples::FEATURE_COUNT;
use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

/// Rejected configuration values, caught at construction time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("court must be at least 1x1, got {width}x{height}")]
    EmptyCourt { width: i32, height: i32 },
    #[error("half paddle length must be positive, got {0}")]
    NonPositivePaddle(i32),
    #[error("paddle range is empty: dead zone {dead_zone} + half length {half_length} leaves no room in height {height}")]
    NoPaddleRoom {
        dead_zone: i32,
        half_length: i32,
        height: i32,
    },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: i32 },
    #[error("goal line margin must be finite and non-negative, got {0}")]
    BadGoalLineMargin(f32),
    #[error("paddle lines cross: edge offset {edge_offset} + pen half-width {pen_half_width} from each side of width {width}")]
    NoCourtRoom {
        edge_offset: i32,
        pen_half_width: i32,
        width: i32,
    },
    #[error("goal lines overlap: left {left} >= right {right}")]
    OverlappingGoalLines { left: f32, right: f32 },
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("network must map {FEATURE_COUNT} inputs to 1 output through non-empty layers, got {0:?}")]
    BadTopology(Vec<usize>),
    #[error("persist interval must be at least 1")]
    ZeroPersistInterval,
}

/// Simulation and training configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub court_width: i32,
    pub court_height: i32,
    pub edge_offset: i32,
    pub paddle_pen_half_width: i32,
    pub half_paddle_length: i32,
    pub dead_zone: i32,
    pub paddle_max_step: i32,
    pub goal_line_margin: f32,
    pub ball_accel: f32,
    pub ball_speed_clamp: f32,
    pub topology: Vec<usize>,
    pub learning_rate: f32,
    pub initial_weight_range: f32,
    pub speed_feature_divisor: f32,
    pub training_cap: usize,
    pub cram_passes: usize,
    pub startup_passes: usize,
    pub persist_every: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            court_width: Params::COURT_WIDTH,
            court_height: Params::COURT_HEIGHT,
            edge_offset: Params::EDGE_OFFSET,
            paddle_pen_half_width: Params::PADDLE_PEN_HALF_WIDTH,
            half_paddle_length: Params::HALF_PADDLE_LENGTH,
            dead_zone: Params::DEAD_ZONE,
            paddle_max_step: Params::PADDLE_MAX_STEP,
            goal_line_margin: Params::GOAL_LINE_MARGIN,
            ball_accel: Params::BALL_ACCEL,
            ball_speed_clamp: Params::BALL_SPEED_CLAMP,
            topology: Params::TOPOLOGY.to_vec(),
            learning_rate: Params::LEARNING_RATE,
            initial_weight_range: Params::INITIAL_WEIGHT_RANGE,
            speed_feature_divisor: Params::SPEED_FEATURE_DIVISOR,
            training_cap: Params::TRAINING_CAP,
            cram_passes: Params::CRAM_PASSES,
            startup_passes: Params::STARTUP_PASSES,
            persist_every: Params::PERSIST_EVERY,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.court_width < 1 || self.court_height < 1 {
            return Err(ConfigError::EmptyCourt {
                width: self.court_width,
                height: self.court_height,
            });
        }
        if self.half_paddle_length < 1 {
            return Err(ConfigError::NonPositivePaddle(self.half_paddle_length));
        }
        for (name, value) in [
            ("edge_offset", self.edge_offset),
            ("paddle_pen_half_width", self.paddle_pen_half_width),
            ("dead_zone", self.dead_zone),
        ] {
            if value < 0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if !(self.goal_line_margin.is_finite() && self.goal_line_margin >= 0.0) {
            return Err(ConfigError::BadGoalLineMargin(self.goal_line_margin));
        }
        // Both insets are non-negative here, so only the sums can overflow
        let vertical = self.dead_zone.checked_add(self.half_paddle_length);
        if vertical.map_or(true, |margin| margin > self.court_height - margin) {
            return Err(ConfigError::NoPaddleRoom {
                dead_zone: self.dead_zone,
                half_length: self.half_paddle_length,
                height: self.court_height,
            });
        }
        let horizontal = self.edge_offset.checked_add(self.paddle_pen_half_width);
        if horizontal.map_or(true, |inset| inset > self.court_width - inset) {
            return Err(ConfigError::NoCourtRoom {
                edge_offset: self.edge_offset,
                pen_half_width: self.paddle_pen_half_width,
                width: self.court_width,
            });
        }
        let (left, right) = (self.left_goal_line(), self.right_goal_line());
        if left >= right {
            return Err(ConfigError::OverlappingGoalLines { left, right });
        }
        for (name, value) in [
            ("ball_accel", self.ball_accel),
            ("ball_speed_clamp", self.ball_speed_clamp),
            ("learning_rate", self.learning_rate),
            ("initial_weight_range", self.initial_weight_range),
            ("speed_feature_divisor", self.speed_feature_divisor),
            ("paddle_max_step", self.paddle_max_step as f32),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        let topology_ok = self.topology.len() >= 2
            && self.topology.first() == Some(&FEATURE_COUNT)
            && self.topology.last() == Some(&1)
            && self.topology.iter().all(|&w| w > 0);
        if !topology_ok {
            return Err(ConfigError::BadTopology(self.topology.clone()));
        }
        if self.persist_every == 0 {
            return Err(ConfigError::ZeroPersistInterval);
        }
        Ok(())
    }

    /// Get X position for paddle based on side
    pub fn paddle_x(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.edge_offset + self.paddle_pen_half_width,
            Side::Right => self.court_width - self.edge_offset - self.paddle_pen_half_width,
        }
    }

    /// Lowest and highest Y a paddle centre may occupy
    pub fn paddle_y_bounds(&self) -> (i32, i32) {
        let margin = self.dead_zone + self.half_paddle_length;
        (margin, self.court_height - margin)
    }

    /// Clamp paddle Y out of the dead zones
    pub fn clamp_paddle_y(&self, y: i32) -> i32 {
        let (low, high) = self.paddle_y_bounds();
        y.clamp(low, high)
    }

    /// Ball X below which the left paddle's line is reached
    pub fn left_goal_line(&self) -> f32 {
        self.edge_offset as f32 + self.goal_line_margin
    }

    /// Ball X above which the right paddle's line is reached
    pub fn right_goal_line(&self) -> f32 {
        (self.court_width - self.edge_offset) as f32 - self.goal_line_margin
    }

    /// True when a ball arriving at `y` lands where no paddle centre can reach
    pub fn in_dead_zone(&self, y: f32) -> bool {
        let (low, high) = self.paddle_y_bounds();
        !(y > low as f32 && y < high as f32)
    }

    pub fn court_center(&self) -> Vec2 {
        Vec2::new(
            (self.court_width / 2) as f32,
            (self.court_height / 2) as f32,
        )
    }

    pub fn height(&self) -> f32 {
        self.court_height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(Config::new().validate(), Ok(()));
    }

    #[test]
    fn test_config_paddle_x() {
        let config = Config::new();
        assert_eq!(config.paddle_x(Side::Left), 33, "Left paddle X position");
        assert_eq!(config.paddle_x(Side::Right), 767, "Right paddle X position");
    }

    #[test]
    fn test_config_clamp_paddle_y() {
        let config = Config::new();
        assert_eq!(config.clamp_paddle_y(0), 24);
        assert_eq!(config.clamp_paddle_y(1000), 576);
        assert_eq!(config.clamp_paddle_y(300), 300);
    }

    #[test]
    fn test_goal_lines() {
        let config = Config::new();
        assert_eq!(config.left_goal_line(), 37.0);
        assert_eq!(config.right_goal_line(), 763.0);
    }

    #[rstest]
    #[case(600.0, true)]
    #[case(0.0, true)]
    #[case(24.0, true)]
    #[case(576.0, true)]
    #[case(24.5, false)]
    #[case(300.0, false)]
    #[case(575.9, false)]
    fn test_in_dead_zone(#[case] y: f32, #[case] expected: bool) {
        assert_eq!(Config::new().in_dead_zone(y), expected);
    }

    #[test]
    fn test_rejects_bad_topology() {
        let config = Config {
            topology: vec![4, 0, 1],
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BadTopology(vec![4, 0, 1]))
        );

        let config = Config {
            topology: vec![3, 1],
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadTopology(_))
        ));
    }

    #[test]
    fn test_rejects_court_without_paddle_room() {
        let config = Config {
            court_height: 40,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoPaddleRoom { .. })
        ));
    }

    #[test]
    fn test_rejects_overlapping_goal_lines() {
        let config = Config {
            court_width: 70,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OverlappingGoalLines { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_learning_rate() {
        let config = Config {
            learning_rate: 0.0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "learning_rate",
                value: 0.0
            })
        );
    }

    #[rstest]
    #[case("edge_offset", Config { edge_offset: -10, ..Config::default() }, -10)]
    #[case("paddle_pen_half_width", Config { paddle_pen_half_width: -1, ..Config::default() }, -1)]
    #[case("dead_zone", Config { dead_zone: -8, ..Config::default() }, -8)]
    fn test_rejects_negative_insets(
        #[case] name: &'static str,
        #[case] config: Config,
        #[case] value: i32,
    ) {
        assert_eq!(config.validate(), Err(ConfigError::Negative { name, value }));
    }

    #[test]
    fn test_rejects_negative_edge_offset_on_widest_court() {
        let config = Config {
            court_width: i32::MAX,
            edge_offset: -10,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                name: "edge_offset",
                value: -10
            })
        );
    }

    #[rstest]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    #[case(-0.5)]
    fn test_rejects_bad_goal_line_margin(#[case] margin: f32) {
        let config = Config {
            goal_line_margin: margin,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadGoalLineMargin(_))
        ));
    }

    #[test]
    fn test_accepts_zero_goal_line_margin() {
        let config = Config {
            goal_line_margin: 0.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_paddle_lines_that_cross() {
        let config = Config {
            court_width: 60,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NoCourtRoom {
                edge_offset: 30,
                pen_half_width: 3,
                width: 60
            })
        );
    }

    #[test]
    fn test_rejects_insets_that_overflow() {
        let config = Config {
            edge_offset: i32::MAX,
            court_width: i32::MAX,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoCourtRoom { .. })
        ));

        let config = Config {
            dead_zone: i32::MAX,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoPaddleRoom { .. })
        ));
    }
}
