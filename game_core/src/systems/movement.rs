use crate::{Ball, Config, Events, Paddle, PaddleIntent, Side};
use hecs::World;

/// Steer every paddle toward its intent target
pub fn move_paddles(world: &mut World, config: &Config) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        if let Some(target) = intent.target_y {
            paddle.move_toward(target, config);
        }
    }
}

/// Move ball one tick; returns the goal line it reached, if any
pub fn move_ball(world: &mut World, config: &Config, events: &mut Events) -> Option<Side> {
    let mut reached = None;
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let heading_down = ball.vel.y > 0.0;
        reached = ball.advance(config);
        if ball.vel.y != 0.0 && (ball.vel.y > 0.0) != heading_down {
            events.ball_hit_wall = true;
        }
    }
    events.reached_line = reached;
    reached
}
