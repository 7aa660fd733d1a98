//! The closed training loop.
//!
//! Each tick moves the ball, resolves any goal-line arrival, steers both
//! paddles and runs one training pass over the corpus while it is below the
//! cap. The trainer (right) paddle opens a sample every time it returns the
//! ball; the sample is labelled when the ball reaches the AI (left) line and
//! kept unless that label lands in a dead zone. The AI paddle steers to
//! wherever the network, in its current half-trained state, predicts the
//! ball will arrive.

use crate::corpus::{Corpus, CorpusError, LoadReport};
use crate::nn::{NeuralNet, NetworkError};
use crate::samples::{Features, TrainingSample};
use crate::systems::*;
use crate::{
    create_paddle, Ball, Config, ConfigError, Events, GameRng, Paddle, PaddleIntent,
    SampleOutcome, Score, Side, TargetMode, TrainerInput,
};
use hecs::World;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid network: {0}")]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

/// Features captured on a trainer return, plus the label once known
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenSample {
    pub features: Features,
    pub arrival_y: Option<f32>,
}

pub struct Trainer {
    world: World,
    config: Config,
    corpus: Corpus,
    net: NeuralNet,
    rng: GameRng,
    score: Score,
    events: Events,
    open_sample: Option<OpenSample>,
    aim_offset: i32,
    epoch: u64,
    tick: u64,
}

impl Trainer {
    /// Paddles in place, first ball served. Nothing loaded or trained yet.
    pub fn new(config: Config, corpus: Corpus, mut rng: GameRng) -> Result<Self, TrainerError> {
        config.validate()?;
        let net = NeuralNet::new(
            &config.topology,
            config.learning_rate,
            config.initial_weight_range,
            &mut rng.0,
        )?;

        let mut world = World::new();
        create_paddle(&mut world, Side::Left, &config);
        create_paddle(&mut world, Side::Right, &config);

        let mut trainer = Self {
            world,
            config,
            corpus,
            net,
            rng,
            score: Score::new(),
            events: Events::new(),
            open_sample: None,
            aim_offset: 0,
            epoch: 0,
            tick: 0,
        };
        trainer.serve();
        Ok(trainer)
    }

    /// Construct, then load the stored corpus and run the start-up passes
    pub fn start(
        config: Config,
        corpus: Corpus,
        rng: GameRng,
    ) -> Result<(Self, LoadReport), TrainerError> {
        let mut trainer = Self::new(config, corpus, rng)?;
        let report = trainer.warm_start()?;
        Ok((trainer, report))
    }

    /// Reload the stored corpus and run the start-up training passes
    pub fn warm_start(&mut self) -> Result<LoadReport, TrainerError> {
        let report = self.corpus.load()?;
        let loss = self.train_passes(self.config.startup_passes);
        log::info!(
            "Warm start: {} samples, {} passes, mean loss {loss:.5}",
            self.corpus.len(),
            self.config.startup_passes
        );
        Ok(report)
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self, input: TrainerInput) -> &Events {
        self.events.clear();
        self.tick += 1;

        match move_ball(&mut self.world, &self.config, &mut self.events) {
            Some(Side::Left) => self.ball_reached_ai_line(),
            Some(Side::Right) => self.ball_reached_trainer_line(),
            None => {}
        }

        self.steer_paddles(input);
        move_paddles(&mut self.world, &self.config);

        if self.corpus.len() < self.config.training_cap {
            self.train_pass();
            self.events.trained_passes += 1;
        }

        &self.events
    }

    fn ball_reached_ai_line(&mut self) {
        let arrival_y = self.ball().map_or(0.0, |b| b.pos.y);
        if let Some(open) = self.open_sample.as_mut().filter(|s| s.arrival_y.is_none()) {
            open.arrival_y = Some(arrival_y);

            let outcome = if self.config.in_dead_zone(arrival_y) {
                SampleOutcome::DeadZone
            } else if self.corpus.add(TrainingSample::new(open.features, arrival_y)) {
                SampleOutcome::Added
            } else {
                SampleOutcome::Duplicate
            };
            log::debug!("Sample labelled at y={arrival_y}: {outcome:?}");
            self.events.sample_outcome = Some(outcome);
        }

        match resolve_goal_line(&mut self.world, &self.config, Side::Left) {
            LineOutcome::InFlight => {}
            LineOutcome::Returned { .. } => {
                self.events.paddle_hit = Some(Side::Left);
                self.pick_aim_offset();
            }
            LineOutcome::Missed => self.point_scored(Side::Left.opponent()),
        }
    }

    fn ball_reached_trainer_line(&mut self) {
        match resolve_goal_line(&mut self.world, &self.config, Side::Right) {
            LineOutcome::InFlight => {}
            LineOutcome::Returned { .. } => {
                self.events.paddle_hit = Some(Side::Right);
                let (Some(ball), Some(trainer)) = (self.ball(), self.paddle(Side::Right)) else {
                    return;
                };
                self.open_sample = Some(OpenSample {
                    features: Features {
                        opponent_paddle_y: trainer.y as f32,
                        ball_y: ball.pos.y,
                        ball_dx: ball.vel.x,
                        ball_dy: ball.vel.y,
                    },
                    arrival_y: None,
                });
                self.events.sample_opened = true;
            }
            LineOutcome::Missed => self.point_scored(Side::Right.opponent()),
        }
    }

    fn point_scored(&mut self, winner: Side) {
        award_point(&mut self.score, &mut self.events, winner);
        let loss = self.train_passes(self.config.cram_passes);
        self.events.trained_passes += self.config.cram_passes;
        log::debug!(
            "Point to {winner:?} ({}-{}), crammed {} passes, mean loss {loss:.5}",
            self.score.left,
            self.score.right,
            self.config.cram_passes
        );
        self.serve();
    }

    fn serve(&mut self) {
        self.epoch += 1;
        serve_ball(&mut self.world, &self.config, Side::Right, &mut self.rng);
        self.pick_aim_offset();
    }

    /// The automatic trainer aims off-centre so returns are rarely perpendicular
    fn pick_aim_offset(&mut self) {
        let half = self.config.half_paddle_length;
        self.aim_offset = self.rng.0.gen_range(-half..half);
    }

    fn steer_paddles(&mut self, input: TrainerInput) {
        let ball_y = self.ball().map(|b| b.pos.y);
        let trainer_target = match input.mode {
            TargetMode::Auto => ball_y.map(|y| y as i32 + self.aim_offset),
            TargetMode::Pointer => Some(input.pointer_y),
        };
        let ai_target = self.ai_target();

        for (_entity, (paddle, intent)) in self.world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
            intent.target_y = match paddle.side {
                Side::Left => ai_target,
                Side::Right => trainer_target,
            };
        }
    }

    /// Where the network currently predicts the ball will cross the AI line
    pub fn ai_target(&self) -> Option<i32> {
        let open = self.open_sample?;
        let height = self.config.height();
        let input = open
            .features
            .to_input(height, self.config.speed_feature_divisor);
        let fraction = self.net.feed_forward(&input).first().copied()?;
        Some((fraction * height).round_ties_even() as i32)
    }

    /// One backprop step per corpus sample. Returns the mean squared error.
    pub fn train_pass(&mut self) -> f32 {
        let height = self.config.height();
        let divisor = self.config.speed_feature_divisor;
        let mut total = 0.0;
        for sample in self.corpus.samples() {
            let input = sample.features.to_input(height, divisor);
            total += self.net.back_propagate(&input, &sample.target(height));
        }
        if self.corpus.is_empty() {
            0.0
        } else {
            total / self.corpus.len() as f32
        }
    }

    /// Run `passes` full passes; returns the mean error of the last one
    pub fn train_passes(&mut self, passes: usize) -> f32 {
        let mut loss = 0.0;
        for _ in 0..passes {
            loss = self.train_pass();
        }
        loss
    }

    pub fn ball(&self) -> Option<Ball> {
        self.world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, ball)| *ball)
    }

    pub fn paddle(&self, side: Side) -> Option<Paddle> {
        self.world
            .query::<&Paddle>()
            .iter()
            .find(|(_e, p)| p.side == side)
            .map(|(_e, p)| *p)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn net(&self) -> &NeuralNet {
        &self.net
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn open_sample(&self) -> Option<OpenSample> {
        self.open_sample
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn set_open_sample(&mut self, sample: Option<OpenSample>) {
        self.open_sample = sample;
    }
}
