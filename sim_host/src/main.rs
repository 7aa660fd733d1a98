use anyhow::Context;
use clap::Parser;
use sim_host::{init_logging, parse_command, Args, Host, LogSink, SystemClock};
use std::io::BufRead;
use std::sync::mpsc;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let config = args.host_config()?;
    let mut host = Host::from_config(&config, Box::new(SystemClock::new()))
        .context("Failed to start trainer")?;

    // Commands arrive one per line on stdin and cross to the host encoded
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            let Some(cmd) = parse_command(&line) else {
                log::warn!("Unknown command {line:?} (p, s, a, q, x, y <pixels>)");
                continue;
            };
            match cmd.to_bytes() {
                Ok(bytes) => {
                    if tx.send(bytes).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("Failed to encode {cmd:?}: {e:?}"),
            }
        }
    });

    let summary = host.run(&mut rx, &mut LogSink::new(1000))?;
    println!(
        "{} ticks, AI {} - trainer {}, {} training samples",
        summary.ticks, summary.score.left, summary.score.right, summary.corpus_len
    );
    Ok(())
}
