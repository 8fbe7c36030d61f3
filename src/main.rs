use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use streakstore::config::Config;
use streakstore::likes::{likes_store, LikesPost};
use streakstore::logging::init_tracing;
use streakstore::store::StateHub;
use streakstore::streak::{display, Teardown};

/// Like counter driven by a momentum streak.
///
/// Reads one command per line from stdin: `+` to like, `-` to dislike,
/// `q` to quit.
#[derive(Debug, Parser)]
#[command(name = "streakstore", version)]
struct Args {
    /// Config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the likes cap.
    #[arg(long)]
    max_likes: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Like,
    Dislike,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim() {
        "+" | "l" | "like" => Some(Input::Like),
        "-" | "d" | "dislike" => Some(Input::Dislike),
        "q" | "quit" => Some(Input::Quit),
        _ => None,
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load()?,
    };
    if let Some(max_likes) = args.max_likes {
        config.likes.max_likes = max_likes;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;

    let hub = StateHub::global();
    let likes = likes_store(&hub, &config.likes)?;
    let post = LikesPost::mount(&likes, &config.streak);
    let shutdown = Teardown::new();

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted");
            signal.signal();
        }
    });

    let mut view = post.streak.view();
    let streak_config = config.streak.clone();
    let max_likes = config.likes.max_likes;
    let stop_render = shutdown.clone();
    let renderer = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = stop_render.wait() => break,
                changed = view.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = *view.borrow_and_update();
                    println!(
                        "{:<16} zoom {}  {:>5.1}%",
                        display::label(&current, &streak_config),
                        display::zoom(&current, &streak_config),
                        display::progress_percent(&current, max_likes),
                    );
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            line = lines.next_line() => match line? {
                Some(line) => match parse_input(&line) {
                    Some(Input::Like) => post.streak.increment(),
                    Some(Input::Dislike) => post.streak.decrement(),
                    Some(Input::Quit) => break,
                    None => tracing::warn!(input = %line, "Unrecognized input"),
                },
                None => break,
            },
        }
    }

    shutdown.signal();
    post.streak.dispose();
    let _ = renderer.await;

    println!("likes: {}", post.likes.value());
    Ok(())
}
