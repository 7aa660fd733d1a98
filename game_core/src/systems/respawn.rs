use crate::{Ball, Config, GameRng, Side};
use hecs::World;

/// Replace the current ball with a fresh serve toward `toward`
pub fn serve_ball(world: &mut World, config: &Config, toward: Side, rng: &mut GameRng) -> Ball {
    let old: Vec<_> = world.query::<&Ball>().iter().map(|(e, _)| e).collect();
    for entity in old {
        let _ = world.despawn(entity);
    }

    let ball = Ball::serve(config, toward, rng);
    world.spawn((ball,));
    ball
}
