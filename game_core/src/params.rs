/// Game and training tuning parameters
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Court
    pub const COURT_WIDTH: i32 = 800;
    pub const COURT_HEIGHT: i32 = 600;

    // Paddle
    pub const EDGE_OFFSET: i32 = 30; // Distance of the paddle line from the court edge
    pub const PADDLE_PEN_HALF_WIDTH: i32 = 3; // Half of the drawn paddle thickness
    pub const HALF_PADDLE_LENGTH: i32 = 16;
    pub const DEAD_ZONE: i32 = 8; // Margin a paddle cannot enter
    pub const PADDLE_MAX_STEP: i32 = 3; // Units per tick
    pub const HIT_ZONES_PER_HALF: i32 = 4; // 9 zones in total: -4..=4

    // Ball
    pub const GOAL_LINE_MARGIN: f32 = 7.0; // Goal line sits this far inside the paddle line
    pub const BALL_ACCEL: f32 = 1.05; // Multiply speed on paddle hit
    pub const BALL_SPEED_CLAMP: f32 = 10.0;
    pub const SERVE_DY_RANGE: (i32, i32) = (300, 2500); // Hundredths, scaled down by 10
    pub const SERVE_DX_RANGE: (i32, i32) = (900, 2500);
    pub const BEHIND_PADDLE_MARGIN: f32 = 3.0; // Past the paddle line by this much = beaten
    pub const OUT_OF_PLAY_MARGIN: f32 = 4.0; // This close to the court edge = point over
    pub const LEFT_RELAUNCH_OFFSET: f32 = 4.0; // Ball X after an AI return, from the edge offset
    pub const RIGHT_RELAUNCH_OFFSET: f32 = 7.0; // Ball X after a trainer return, from the edge offset

    // Training
    pub const TOPOLOGY: [usize; 6] = [4, 4, 4, 4, 4, 1];
    pub const LEARNING_RATE: f32 = 0.01;
    pub const INITIAL_WEIGHT_RANGE: f32 = 0.5;
    pub const SPEED_FEATURE_DIVISOR: f32 = 10.0;
    pub const TRAINING_CAP: usize = 1000; // Per-tick training stops at this corpus size
    pub const CRAM_PASSES: usize = 100; // Extra passes after every point
    pub const STARTUP_PASSES: usize = 1000;
    pub const PERSIST_EVERY: usize = 100;

    // Score
    pub const SCORE_WRAP: u8 = 99;

    // Host
    pub const QUIET_YIELD_EVERY: u64 = 10;
    pub const TICK_INTERVALS_MS: [u64; 4] = [5, 20, 100, 1000];
}
