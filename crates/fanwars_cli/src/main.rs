//! Command-line client for the Fan Wars core.
//!
//! # Responsibility
//! - Drive feed, trending, thread, and vote use cases from a terminal.
//! - Resolve the store the same way the app does (environment, `.env`).
//!
//! # Invariants
//! - Output is plain lines, one record per line.
//! - Any failure prints to stderr and exits with code 1.

use clap::{Parser, Subcommand, ValueEnum};
use fanwars_core::db::open_db;
use fanwars_core::{
    core_version, ping, resolve_from_env, CommentId, RestStore, SqliteStore, Store, StoreConfig,
    VoteDirection, WarId, WarService,
};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fanwars", version)]
#[command(about = "Fan Wars rivalry threads from the terminal")]
#[command(
    after_help = "Environment:\n  FANWARS_DB_PATH     Local SQLite store (takes precedence)\n  FANWARS_STORE_URL   Hosted store endpoint\n  FANWARS_STORE_KEY   Hosted store access key"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Check core linkage.
    Ping,
    /// List all wars, most discussed first.
    Wars,
    /// List wars with at least one comment.
    Trending,
    /// Start a new war.
    Create { team1: String, team2: String },
    /// Show a war's thread.
    Comments { war_id: WarId },
    /// Post a comment.
    Comment { war_id: WarId, text: String },
    /// Vote on a comment.
    Vote {
        comment_id: CommentId,
        #[arg(value_enum)]
        direction: Direction,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Up => VoteDirection::Up,
            Direction::Down => VoteDirection::Down,
        }
    }
}

type CliResult<T> = Result<T, String>;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> CliResult<()> {
    if command == Command::Ping {
        println!("fanwars_core ping={}", ping());
        println!("fanwars_core version={}", core_version());
        return Ok(());
    }

    let config = resolve_from_env();
    if config.is_none() {
        eprintln!("warning: no store configured; lists are empty and writes fail");
    }
    with_service(config, |service| dispatch(service, command))
}

fn dispatch(service: &WarService<&dyn Store>, command: Command) -> CliResult<()> {
    match command {
        Command::Ping => Ok(()),
        Command::Wars => {
            for war in service.feed().map_err(|err| err.to_string())? {
                let badge = if war.is_active() { "active" } else { "new" };
                println!(
                    "{}  {}  comments={} {}",
                    war.id,
                    war.title(),
                    war.total_comments,
                    badge
                );
            }
            Ok(())
        }
        Command::Trending => {
            let ranked = service.trending().map_err(|err| err.to_string())?;
            if ranked.is_empty() {
                println!("no trending wars yet");
            }
            for entry in ranked {
                println!(
                    "#{} {}  comments={}  {}",
                    entry.rank,
                    entry.war.title(),
                    entry.war.total_comments,
                    entry.war.id
                );
            }
            Ok(())
        }
        Command::Create { team1, team2 } => {
            let war = service
                .create_war(&team1, &team2)
                .map_err(|err| err.to_string())?;
            println!("created {}  {}", war.id, war.title());
            Ok(())
        }
        Command::Comments { war_id } => {
            let Some(thread) = service
                .open_thread(war_id)
                .map_err(|err| err.to_string())?
            else {
                return Ok(());
            };
            println!(
                "{}  comments={}",
                thread.war().title(),
                thread.war().total_comments
            );
            for comment in thread.comments() {
                println!("{:>5}  {}  {}", comment.votes, comment.id, comment.content);
            }
            Ok(())
        }
        Command::Comment { war_id, text } => {
            let comment = service
                .comments()
                .create_comment(war_id, &text)
                .map_err(|err| err.to_string())?;
            println!("posted {}", comment.id);
            Ok(())
        }
        Command::Vote {
            comment_id,
            direction,
        } => {
            let votes = service
                .comments()
                .adjust_votes(comment_id, VoteDirection::from(direction).delta())
                .map_err(|err| err.to_string())?;
            println!("votes={votes}");
            Ok(())
        }
    }
}

fn with_service(
    config: Option<StoreConfig>,
    f: impl FnOnce(&WarService<&dyn Store>) -> CliResult<()>,
) -> CliResult<()> {
    match config {
        None => f(&WarService::unconfigured()),
        Some(StoreConfig::Local(path)) => {
            let conn = open_db(&path).map_err(|err| err.to_string())?;
            let store = SqliteStore::try_new(&conn).map_err(|err| err.to_string())?;
            f(&WarService::new(&store as &dyn Store))
        }
        Some(StoreConfig::Remote(remote)) => {
            let store = RestStore::new(&remote).map_err(|err| err.to_string())?;
            f(&WarService::new(&store as &dyn Store))
        }
    }
}
