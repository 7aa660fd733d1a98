pub mod components;
pub mod config;
pub mod corpus;
pub mod nn;
pub mod params;
pub mod resources;
pub mod samples;
pub mod systems;
pub mod trainer;

pub use components::*;
pub use config::*;
pub use corpus::*;
pub use nn::*;
pub use params::*;
pub use resources::*;
pub use samples::*;
pub use trainer::*;

use hecs::World;

/// Helper to create a paddle entity on its line, vertically centred
pub fn create_paddle(world: &mut World, side: Side, config: &Config) -> hecs::Entity {
    world.spawn((Paddle::new(side, config), PaddleIntent::new()))
}

/// Helper to create a ball entity mid-flight
#[cfg(test)]
pub(crate) fn create_ball(
    world: &mut World,
    pos: glam::Vec2,
    vel: glam::Vec2,
    config: &Config,
) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel, config.ball_accel),))
}
