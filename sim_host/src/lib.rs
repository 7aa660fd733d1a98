//! Headless host for the self-training Pong simulation
//!
//! Owns the tick loop and maps input-layer commands onto it.

pub mod cli;
pub mod config;
pub mod host;


pub use cli::Args;
pub use config::HostConfig;
pub use host::*;

use log::LevelFilter;
use proto::HostCommand;

pub fn init_logging() {
    env_logger::builder()
        .format_target(false)
        .format_timestamp_secs()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init()
}

/// Keyboard-style command line: `p`, `s`, `a`, `q`, `x`, or `y <pixels>`
pub fn parse_command(line: &str) -> Option<HostCommand> {
    let mut words = line.split_whitespace();
    let cmd = match words.next()?.to_ascii_lowercase().as_str() {
        "p" => HostCommand::TogglePause,
        "s" => HostCommand::CycleSpeed,
        "a" => HostCommand::ToggleAutoMode,
        "q" => HostCommand::ToggleQuietMode,
        "x" | "exit" => HostCommand::Stop,
        "y" => HostCommand::PointerMoved {
            y: words.next()?.parse().ok()?,
        },
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
#[ctor::ctor]
fn init() {
    let _ = env_logger::builder()
        .format_timestamp_secs()
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .is_test(true)
        .try_init();
}
