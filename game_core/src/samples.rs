//! Training samples captured from live play.
//!
//! A sample pairs what the AI can see when the trainer returns the ball
//! (trainer paddle Y, ball Y, ball velocity) with where the ball later
//! crosses the AI goal line. The canonical text form is five comma-joined
//! decimals in that order; it doubles as the dedup key and the on-disk record.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of network inputs a sample provides
pub const FEATURE_COUNT: usize = 4;

const FIELD_COUNT: usize = FEATURE_COUNT + 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleParseError {
    #[error("expected {FIELD_COUNT} comma-separated fields, got {0}")]
    FieldCount(usize),
    #[error("field {index} is not a number: {value:?}")]
    NotANumber { index: usize, value: String },
}

/// What the ball and opposing paddle looked like when the trainer struck it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub opponent_paddle_y: f32,
    pub ball_y: f32,
    pub ball_dx: f32,
    pub ball_dy: f32,
}

impl Features {
    /// Network input: positions as a fraction of court height, speeds over a fixed divisor
    pub fn to_input(&self, height: f32, speed_divisor: f32) -> [f32; FEATURE_COUNT] {
        [
            self.opponent_paddle_y / height,
            self.ball_y / height,
            self.ball_dx / speed_divisor,
            self.ball_dy / speed_divisor,
        ]
    }
}

/// A finalized sample: features plus the Y where the ball reached the AI line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSample {
    pub features: Features,
    pub arrival_y: f32,
}

impl TrainingSample {
    pub fn new(features: Features, arrival_y: f32) -> Self {
        Self {
            features,
            arrival_y,
        }
    }

    pub fn target(&self, height: f32) -> [f32; 1] {
        [self.arrival_y / height]
    }
}

impl fmt::Display for TrainingSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Features {
            opponent_paddle_y,
            ball_y,
            ball_dx,
            ball_dy,
        } = self.features;
        write!(
            f,
            "{opponent_paddle_y},{ball_y},{ball_dx},{ball_dy},{}",
            self.arrival_y
        )
    }
}

impl FromStr for TrainingSample {
    type Err = SampleParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split(',').collect();
        if tokens.len() != FIELD_COUNT {
            return Err(SampleParseError::FieldCount(tokens.len()));
        }

        let mut fields = [0.0f32; FIELD_COUNT];
        for (index, (field, token)) in fields.iter_mut().zip(&tokens).enumerate() {
            *field = token
                .trim()
                .parse()
                .map_err(|_| SampleParseError::NotANumber {
                    index,
                    value: token.to_string(),
                })?;
        }

        Ok(Self {
            features: Features {
                opponent_paddle_y: fields[0],
                ball_y: fields[1],
                ball_dx: fields[2],
                ball_dy: fields[3],
            },
            arrival_y: fields[4],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> TrainingSample {
        TrainingSample::new(
            Features {
                opponent_paddle_y: 312.0,
                ball_y: 305.5,
                ball_dx: -2.205,
                ball_dy: 1.05,
            },
            148.25,
        )
    }

    #[test]
    fn test_canonical_encoding() {
        assert_eq!(sample().to_string(), "312,305.5,-2.205,1.05,148.25");
    }

    #[test]
    fn test_decode_canonical_encoding() {
        let decoded: TrainingSample = "312,305.5,-2.205,1.05,148.25".parse().unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        assert_eq!(
            "1,2,3,4".parse::<TrainingSample>(),
            Err(SampleParseError::FieldCount(4))
        );
        assert_eq!(
            "1,2,3,4,5,6".parse::<TrainingSample>(),
            Err(SampleParseError::FieldCount(6))
        );
    }

    #[test]
    fn test_decode_rejects_non_numeric_field() {
        assert_eq!(
            "1,2,x,4,5".parse::<TrainingSample>(),
            Err(SampleParseError::NotANumber {
                index: 2,
                value: "x".to_string()
            })
        );
    }

    #[test]
    fn test_features_scale_into_network_input() {
        let input = sample().features.to_input(600.0, 10.0);
        assert!((input[0] - 0.52).abs() < 1e-6);
        assert!((input[1] - 305.5 / 600.0).abs() < 1e-6);
        assert!((input[2] + 0.2205).abs() < 1e-6);
        assert!((input[3] - 0.105).abs() < 1e-6);
        assert!((sample().target(600.0)[0] - 148.25 / 600.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(
            a in -1000.0f32..1000.0,
            b in -1000.0f32..1000.0,
            c in -10.0f32..10.0,
            d in -10.0f32..10.0,
            e in -1000.0f32..1000.0,
        ) {
            let sample = TrainingSample::new(
                Features { opponent_paddle_y: a, ball_y: b, ball_dx: c, ball_dy: d },
                e,
            );
            let decoded: TrainingSample = sample.to_string().parse().unwrap();
            prop_assert_eq!(decoded, sample);
        }
    }
}
