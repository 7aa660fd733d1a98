use crate::config::HostConfig;
use game_core::*;
use proto::{Frame, HostCommand};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

// Abstract frame output for testing
pub trait FrameSink {
    fn publish(&mut self, frame: &Frame) -> anyhow::Result<()>;
}

// Abstract command input
pub trait CommandSource {
    /// Commands that arrived since the last poll
    fn poll(&mut self) -> Vec<HostCommand>;
}

// Abstract environment (time, sleeping, yielding)
pub trait Clock {
    fn now(&self) -> Duration; // Since an arbitrary fixed start
    fn sleep(&mut self, duration: Duration);
    fn yield_now(&mut self);
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn yield_now(&mut self) {
        std::thread::yield_now();
    }
}

/// Encoded commands from an input thread; undecodable messages are dropped
impl CommandSource for Receiver<Vec<u8>> {
    fn poll(&mut self) -> Vec<HostCommand> {
        let mut commands = Vec::new();
        loop {
            match self.try_recv() {
                Ok(bytes) => match HostCommand::from_bytes(&bytes) {
                    Ok(cmd) => commands.push(cmd),
                    Err(e) => log::warn!("Failed to parse host command: {e:?}"),
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        commands
    }
}

/// One batch per poll, then nothing
impl CommandSource for VecDeque<Vec<HostCommand>> {
    fn poll(&mut self) -> Vec<HostCommand> {
        self.pop_front().unwrap_or_default()
    }
}

/// Logs a scoreboard line every `every` frames
pub struct LogSink {
    every: u64,
}

impl LogSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl FrameSink for LogSink {
    fn publish(&mut self, frame: &Frame) -> anyhow::Result<()> {
        if frame.tick % self.every == 0 {
            log::info!(
                "tick={} epoch={} score {:02}-{:02} samples={} ball=({:.1}, {:.1})",
                frame.tick,
                frame.epoch,
                frame.score_left,
                frame.score_right,
                frame.corpus_len,
                frame.ball_x,
                frame.ball_y
            );
        }
        Ok(())
    }
}

/// Interval that follows `current` in the speed cycle; anything off the cycle restarts it
pub fn next_interval(current: u64) -> u64 {
    let cycle = Params::TICK_INTERVALS_MS;
    cycle
        .iter()
        .position(|&ms| ms == current)
        .and_then(|i| cycle.get(i + 1))
        .copied()
        .unwrap_or(cycle[0])
}

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames: u64,
    pub score: Score,
    pub corpus_len: usize,
}

/// Drives the trainer on a periodic tick and applies host commands
pub struct Host {
    clock: Box<dyn Clock>,
    trainer: Trainer,
    tick_interval_ms: u64,
    tick_limit: Option<u64>,
    input: TrainerInput,
    paused: bool,
    quiet: bool,
    running: bool,
    frames: u64,
}

impl Host {
    pub fn new(trainer: Trainer, config: &HostConfig, clock: Box<dyn Clock>) -> Self {
        let mode = if config.auto_trainer {
            TargetMode::Auto
        } else {
            TargetMode::Pointer
        };
        Self {
            clock,
            trainer,
            tick_interval_ms: config.tick_interval_ms,
            tick_limit: config.tick_limit,
            input: TrainerInput {
                mode,
                pointer_y: config.game.court_height / 2,
            },
            paused: false,
            quiet: config.fast_forward,
            running: true,
            frames: 0,
        }
    }

    /// Build the corpus store and trainer described by `config`, load and warm up
    pub fn from_config(config: &HostConfig, clock: Box<dyn Clock>) -> Result<Self, TrainerError> {
        let persist_every = config.game.persist_every;
        let corpus = match &config.corpus_path {
            Some(path) => Corpus::new(Box::new(FileStore::new(path)), persist_every),
            None => Corpus::in_memory(persist_every),
        };
        let (trainer, report) =
            Trainer::start(config.game.clone(), corpus, GameRng::new(config.seed))?;
        if report.skipped > 0 {
            log::warn!("{} stored samples were malformed and skipped", report.skipped);
        }
        Ok(Self::new(trainer, config, clock))
    }

    pub fn handle_command(&mut self, cmd: HostCommand) {
        match cmd {
            HostCommand::PointerMoved { y } => self.input.pointer_y = y,
            HostCommand::TogglePause => {
                self.paused = !self.paused;
                log::info!("Paused: {}", self.paused);
            }
            HostCommand::CycleSpeed => {
                self.tick_interval_ms = next_interval(self.tick_interval_ms);
                log::info!("Tick interval: {}ms", self.tick_interval_ms);
            }
            HostCommand::ToggleAutoMode => {
                self.input.mode = match self.input.mode {
                    TargetMode::Auto => TargetMode::Pointer,
                    TargetMode::Pointer => TargetMode::Auto,
                };
                log::info!("Trainer mode: {:?}", self.input.mode);
            }
            HostCommand::ToggleQuietMode => {
                self.quiet = !self.quiet;
                log::info!("Quiet mode: {}", self.quiet);
            }
            HostCommand::Stop => self.running = false,
        }
    }

    /// Run until stopped or the tick limit is reached
    pub fn run(
        &mut self,
        commands: &mut dyn CommandSource,
        sink: &mut dyn FrameSink,
    ) -> anyhow::Result<RunSummary> {
        log::info!(
            "Host starting: interval={}ms quiet={} limit={:?}",
            self.tick_interval_ms,
            self.quiet,
            self.tick_limit
        );

        while self.running {
            for cmd in commands.poll() {
                self.handle_command(cmd);
            }
            if !self.running || self.limit_reached() {
                break;
            }

            if self.paused {
                self.clock.sleep(self.interval());
                continue;
            }

            if self.quiet {
                self.trainer.tick(self.input);
                if self.trainer.tick_count() % Params::QUIET_YIELD_EVERY == 0 {
                    self.clock.yield_now();
                }
            } else {
                let started = self.clock.now();
                self.trainer.tick(self.input);
                sink.publish(&self.frame())?;
                self.frames += 1;
                let elapsed = self.clock.now().saturating_sub(started);
                self.clock.sleep(self.interval().saturating_sub(elapsed));
            }
        }

        let summary = self.summary();
        log::info!(
            "Host stopped after {} ticks, score {}-{}, {} samples",
            summary.ticks,
            summary.score.left,
            summary.score.right,
            summary.corpus_len
        );
        Ok(summary)
    }

    fn limit_reached(&self) -> bool {
        self.tick_limit
            .is_some_and(|limit| self.trainer.tick_count() >= limit)
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Generate a frame from the current trainer state
    pub fn frame(&self) -> Frame {
        let config = self.trainer.config();
        let centre = config.court_center();
        let (ball_x, ball_y) = self
            .trainer
            .ball()
            .map(|ball| (ball.pos.x, ball.pos.y))
            .unwrap_or((centre.x, centre.y));
        let paddle_y = |side| {
            self.trainer
                .paddle(side)
                .map_or(config.court_height / 2, |p| p.y)
        };
        let score = self.trainer.score();

        Frame {
            tick: self.trainer.tick_count(),
            epoch: self.trainer.epoch(),
            ball_x,
            ball_y,
            paddle_left_y: paddle_y(Side::Left),
            paddle_right_y: paddle_y(Side::Right),
            paddle_half_length: config.half_paddle_length,
            score_left: score.left,
            score_right: score.right,
            corpus_len: u32::try_from(self.trainer.corpus().len()).unwrap_or(u32::MAX),
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.trainer.tick_count(),
            frames: self.frames,
            score: self.trainer.score(),
            corpus_len: self.trainer.corpus().len(),
        }
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    pub fn input(&self) -> TrainerInput {
        self.input
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }
}
