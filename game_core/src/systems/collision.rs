use crate::params::Params;
use crate::{Ball, Config, Paddle, Side};
use hecs::World;

/// What happened when the ball reached a paddle's goal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Missed, but still short of the court edge; keep travelling
    InFlight,
    /// Struck the paddle in the given hit zone and bounced back
    Returned { zone: i32 },
    /// Missed and left the court; the other side scores
    Missed,
}

/// Resolve contact between the ball and `side`'s paddle
pub fn resolve_goal_line(world: &mut World, config: &Config, side: Side) -> LineOutcome {
    let paddle = world
        .query::<&Paddle>()
        .iter()
        .find(|(_e, p)| p.side == side)
        .map(|(_e, p)| *p);
    let Some(paddle) = paddle else {
        return LineOutcome::InFlight;
    };

    let width = config.court_width as f32;
    let edge = config.edge_offset as f32;

    let mut outcome = LineOutcome::InFlight;
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let zone = paddle.hit_test(ball.pos.y.round_ties_even() as i32, config.half_paddle_length);
        let behind = match side {
            Side::Left => ball.pos.x < edge - Params::BEHIND_PADDLE_MARGIN,
            Side::Right => ball.pos.x > width - edge + Params::BEHIND_PADDLE_MARGIN,
        };

        outcome = match zone {
            Some(zone) if !behind => {
                ball.pos.x = match side {
                    Side::Left => edge + Params::LEFT_RELAUNCH_OFFSET,
                    Side::Right => width - (edge + Params::RIGHT_RELAUNCH_OFFSET),
                };
                ball.bounce_off_paddle(zone, config.ball_speed_clamp);
                LineOutcome::Returned { zone }
            }
            _ => {
                let out_of_play = match side {
                    Side::Left => ball.pos.x <= Params::OUT_OF_PLAY_MARGIN,
                    Side::Right => ball.pos.x >= width - Params::OUT_OF_PLAY_MARGIN,
                };
                if out_of_play {
                    LineOutcome::Missed
                } else {
                    LineOutcome::InFlight
                }
            }
        };
    }
    outcome
}
