//! gitxp - Gamified Git wrapper binary.
//!
//! Internal commands (`profile`, `help`) are parsed with clap; every other
//! argument list is forwarded verbatim to git, and a successful commit or
//! push triggers the progression pass.

use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use tracing::{debug, warn};

use gitxp::config::{AppSettings, GameConfig};
use gitxp::engine::{CommandContext, GameCommand, ProgressionEngine};
use gitxp::git::GitRunner;
use gitxp::profile::store::ProfileStore;
use gitxp::render;

#[derive(Parser)]
#[command(name = "gitxp")]
#[command(version = "0.1.0")]
#[command(about = "Gamify your Git experience", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: InternalCommand,
}

#[derive(Subcommand)]
enum InternalCommand {
    /// Display user profile, stats, or clear progress
    Profile {
        /// Display detailed statistics and achievement descriptions
        #[arg(long)]
        stats: bool,

        /// Clear all progress for the current user
        #[arg(long)]
        clear: bool,

        /// Show all possible achievements
        #[arg(long)]
        details: bool,
    },

    /// Show the help message
    Help,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    // Only `profile` and `help` belong to the wrapper itself; any other
    // first token must reach git untouched, so the split happens before
    // clap ever sees the arguments.
    let is_internal = matches!(
        raw_args.first().map(|arg| arg.to_lowercase()).as_deref(),
        Some("profile") | Some("help")
    );

    let exit_code = if is_internal {
        let cli = Cli::parse();
        init_tracing(cli.verbose);
        run_internal(cli.command).await?
    } else {
        init_tracing(false);
        run_wrapper(&raw_args).await?
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "gitxp=debug" } else { "gitxp=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Forward the invocation to git; on success, gamify commit and push.
async fn run_wrapper(args: &[String]) -> anyhow::Result<i32> {
    let settings = AppSettings::load();
    let runner = match GitRunner::new(&settings) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Ok(1);
        }
    };

    let exit_code = runner.run_passthrough(args).await?;
    if exit_code != 0 {
        return Ok(exit_code);
    }

    if matches!(
        GameCommand::from_args(args),
        Some(GameCommand::Commit | GameCommand::Push)
    ) {
        println!("{}", render::separator());
        if let Err(e) = run_progression(&runner, args).await {
            // The wrapped command already succeeded; progression problems
            // must not change its outcome.
            warn!("Progression pass failed: {e}");
        }
    }

    Ok(exit_code)
}

/// Run one progression round and render what changed.
async fn run_progression(runner: &GitRunner, args: &[String]) -> anyhow::Result<()> {
    let Some(email) = runner.user_email().await else {
        debug!("No git identity configured; skipping progression");
        return Ok(());
    };
    let Some(command) = GameCommand::from_args(args) else {
        return Ok(());
    };
    debug!("Running {} progression round for {email}", command.action_name());

    let game_config = GameConfig::load();
    let store = ProfileStore::default_location()?;
    let mut profile = store.load(&email)?;

    let now = Local::now();
    let mut ctx = CommandContext::new(command, now.date_naive(), now.hour());
    if command == GameCommand::Commit {
        ctx.diff = runner.commit_diff_stats().await;
        ctx.commit_message = runner.last_commit_message().await;
    }

    let engine = ProgressionEngine::new(
        &game_config.levels,
        &game_config.rewards,
        &game_config.achievements,
    );
    let Some(report) = engine.apply(&mut profile, &ctx) else {
        debug!("Round earned nothing; profile left untouched");
        return Ok(());
    };

    store.save(&profile)?;

    for unlocked in &report.newly_unlocked {
        println!("{}", render::achievement_unlocked(unlocked));
    }
    println!("{}", render::xp_gain(&report, &game_config.levels));
    if report.leveled_up {
        println!(
            "{}",
            render::level_up(report.new_level, &game_config.levels)
        );
    }

    Ok(())
}

async fn run_internal(command: InternalCommand) -> anyhow::Result<i32> {
    match command {
        InternalCommand::Help => {
            println!("{}", render::help());
            Ok(0)
        }
        InternalCommand::Profile {
            stats,
            clear,
            details,
        } => run_profile(stats, clear, details).await,
    }
}

async fn run_profile(stats: bool, clear: bool, details: bool) -> anyhow::Result<i32> {
    let settings = AppSettings::load();
    let runner = match GitRunner::new(&settings) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Ok(1);
        }
    };

    let Some(email) = runner.user_email().await else {
        eprintln!("{}", render::identity_error());
        return Ok(1);
    };

    let store = ProfileStore::default_location()?;

    if clear {
        print!("Are you sure you want to clear all progress for '{email}'? [y/N] ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;

        if answer.trim().eq_ignore_ascii_case("y") {
            match store.clear(&email) {
                Ok(()) => {
                    println!(
                        "{}",
                        format!("Profile for '{email}' has been successfully cleared!").green()
                    );
                }
                Err(e) => {
                    eprintln!(
                        "{} Failed to clear profile for '{email}': {e}",
                        "Error:".red().bold()
                    );
                    return Ok(1);
                }
            }
        } else {
            println!("{}", "Clear cancelled.".cyan());
        }
        return Ok(0);
    }

    let game_config = GameConfig::load();
    let profile = store.load(&email)?;

    if stats {
        println!(
            "{}",
            render::detailed_stats(&profile, &game_config.achievements)
        );
    } else if details {
        println!(
            "{}",
            render::all_achievements(&profile, &game_config.achievements)
        );
    } else {
        println!(
            "{}",
            render::profile(&profile, &game_config.levels, &game_config.achievements)
        );
    }

    Ok(0)
}
