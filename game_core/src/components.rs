use crate::config::Config;
use crate::params::Params;
use crate::resources::GameRng;
use glam::Vec2;
use rand::Rng;

/// Which side of the court a paddle (or goal line) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,  // AI paddle
    Right, // Trainer (human or automatic) paddle
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Paddle component - one per side, X fixed, Y bounded by the dead zones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paddle {
    pub side: Side,
    pub x: i32,
    pub y: i32, // Centre of the paddle
}

impl Paddle {
    /// Paddle on its line, vertically centred
    pub fn new(side: Side, config: &Config) -> Self {
        Self {
            side,
            x: config.paddle_x(side),
            y: config.court_height / 2,
        }
    }

    /// Step toward `y_target`, at most `paddle_max_step` units, never into a dead zone
    pub fn move_toward(&mut self, y_target: i32, config: &Config) {
        let step = config.paddle_max_step;
        let y = y_target.clamp(self.y - step, self.y + step);
        self.y = config.clamp_paddle_y(y);
    }

    /// Hit zone in `-4..=4` for a ball at `ball_y`, or `None` when the ball misses.
    ///
    /// Each zone covers a quarter of the half length; ties round to even.
    pub fn hit_test(&self, ball_y: i32, half_length: i32) -> Option<i32> {
        let dist = (ball_y - self.y) as f32;
        if dist.abs() > half_length as f32 {
            return None;
        }
        let zone_size = half_length as f32 / Params::HIT_ZONES_PER_HALF as f32;
        Some((dist / zone_size).round_ties_even() as i32)
    }
}

/// Target the paddle steers toward this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleIntent {
    pub target_y: Option<i32>, // None = hold position
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: f32, // Speed multiplier applied on every paddle bounce
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, accel: f32) -> Self {
        Self { pos, vel, accel }
    }

    /// Fresh ball at court centre travelling toward `toward`
    pub fn serve(config: &Config, toward: Side, rng: &mut GameRng) -> Self {
        let (dy_lo, dy_hi) = Params::SERVE_DY_RANGE;
        let (dx_lo, dx_hi) = Params::SERVE_DX_RANGE;

        let dy_sign = if rng.0.gen_bool(0.5) { -1.0 } else { 1.0 };
        let dx_sign = match toward {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };

        let dy = rng.0.gen_range(dy_lo..dy_hi) as f32 / 100.0 * dy_sign / 10.0;
        let dx = rng.0.gen_range(dx_lo..dx_hi) as f32 / 100.0 * dx_sign / 10.0;

        Self::new(config.court_center(), Vec2::new(dx, dy), config.ball_accel)
    }

    /// Advance one tick, reflecting off the top/bottom edges.
    ///
    /// Returns the side whose goal line the ball has reached, if any.
    pub fn advance(&mut self, config: &Config) -> Option<Side> {
        self.pos += self.vel;

        let height = config.height();
        if self.pos.y < 0.0 {
            self.vel.y = -self.vel.y;
            self.pos.y = self.vel.y;
        } else if self.pos.y > height {
            self.vel.y = -self.vel.y;
            self.pos.y = height + self.vel.y;
        }

        if self.pos.x < config.left_goal_line() {
            Some(Side::Left)
        } else if self.pos.x > config.right_goal_line() {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Reverse off a paddle; the return angle follows the hit zone
    pub fn bounce_off_paddle(&mut self, hit_zone: i32, speed_clamp: f32) {
        // Step back out of the paddle
        self.pos.x -= self.vel.x;

        self.vel.x = -self.vel.x;
        self.vel.y = hit_zone as f32 / 2.0;

        self.vel *= self.accel;
        self.vel = self.vel.clamp(Vec2::splat(-speed_clamp), Vec2::splat(speed_clamp));
    }
}
