//! Judge console for the padel scoring engine.
//!
//! Spawns a MatchSession and drives it from stdin, one command per line,
//! printing the scoreboard after every accepted action.

mod config;
mod console;
mod logging;

use anyhow::Error;
use chrono::Utc;
use config::{CliOverrides, JudgeConfig};
use console::{COMMANDS_HELP, Command, parse_command, render};
use ctrlc::set_handler;
use log::info;
use padel_score::{
    ControlMode, MatchHandle, MatchSession, SessionResponse, Team, TeamSlot,
    session::StateChangeNotification,
};
use pico_args::Arguments;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

const HELP: &str = "\
Run a padel match from the judge's table

USAGE:
  padel_judge [OPTIONS]

OPTIONS:
  --best-of    N           Sets in the match, 3 or 5        [default: env PADEL_BEST_OF or 3]
  --mode       MODE        traditional | golden-point       [default: env PADEL_GAME_MODE or traditional]
  --language   LANG        es | en                          [default: env PADEL_LANGUAGE or es]
  --team1      NAME        Team 1 name                      [default: env PADEL_TEAM1_NAME or Equipo 1]
  --team2      NAME        Team 2 name                      [default: env PADEL_TEAM2_NAME or Equipo 2]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  PADEL_CONTROL_MODE       sensors | judge
  PADEL_SIDE_CHANGE        reset-game-total | completed-set-odd-total
  PADEL_TEAM1_PLAYERS      Comma separated player names (same for PADEL_TEAM2_PLAYERS)
  RUST_LOG                 Log filter, e.g. padel_score=debug
  (Values are also read from a .env file)
";

const NOTIFICATION_BUFFER: usize = 16;
const CONSOLE_SUBSCRIBER: u64 = 1;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = CliOverrides {
        best_of: pargs.opt_value_from_str("--best-of")?,
        game_mode: pargs.opt_value_from_str("--mode")?,
        language: pargs.opt_value_from_str("--language")?,
        team1_name: pargs.opt_value_from_str("--team1")?,
        team2_name: pargs.opt_value_from_str("--team2")?,
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = JudgeConfig::from_env(overrides)?;
    config.validate()?;

    info!(
        "Starting judge console: {} vs {}, best of {}, {}",
        config.team1.name,
        config.team2.name,
        config.match_config.best_of_sets,
        config.match_config.game_mode
    );
    if config.match_config.control_mode == ControlMode::Sensors {
        info!("Control mode is sensors, console points stand in for the sensor feed");
    }

    let handle = MatchSession::spawn(config.match_config, config.timings);
    watch_board(&handle).await?;

    start_match(&handle, &config).await?;
    println!("{COMMANDS_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Point(slot) => {
                let team_id = team(&config, slot).id.clone();
                let response = handle.add_point(team_id).await?;
                report(&handle, "point", response).await?;
            }
            Command::Undo => {
                let response = handle.undo_last_point().await?;
                report(&handle, "undo", response).await?;
            }
            Command::Status => print_board(&handle).await?,
            Command::NewMatch => start_match(&handle, &config).await?,
            Command::Help => println!("{COMMANDS_HELP}"),
            Command::Quit => break,
        }
    }

    handle.close().await?;
    info!("Judge console stopped");

    Ok(())
}

fn team(config: &JudgeConfig, slot: TeamSlot) -> &Team {
    match slot {
        TeamSlot::One => &config.team1,
        TeamSlot::Two => &config.team2,
    }
}

async fn start_match(handle: &MatchHandle, config: &JudgeConfig) -> Result<(), Error> {
    let response = handle
        .start_match(config.team1.clone(), config.team2.clone())
        .await?;
    report(handle, "start", response).await
}

/// Log the outcome of an action and show the board when it was applied
async fn report(
    handle: &MatchHandle,
    action: &str,
    response: SessionResponse,
) -> Result<(), Error> {
    match response {
        SessionResponse::Success => {
            let snapshot = handle.snapshot().await?;
            if let Some(current) = snapshot.current_match.as_ref() {
                logging::log_match_event(action, current);
            }
            print!("{}", render(&snapshot, Utc::now()));
        }
        SessionResponse::Ignored(reason) => {
            logging::log_ignored(action, &reason.to_string());
            println!("Ignored: {reason}");
        }
    }

    Ok(())
}

async fn print_board(handle: &MatchHandle) -> Result<(), Error> {
    let snapshot = handle.snapshot().await?;
    print!("{}", render(&snapshot, Utc::now()));
    Ok(())
}

/// Reprint the board when the session clears a finished match on its own
async fn watch_board(handle: &MatchHandle) -> Result<(), Error> {
    let (sender, mut receiver) = mpsc::channel(NOTIFICATION_BUFFER);
    handle.subscribe(CONSOLE_SUBSCRIBER, sender).await?;

    let handle = handle.clone();
    tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            if notification == StateChangeNotification::MatchCleared
                && print_board(&handle).await.is_err()
            {
                break;
            }
        }
    });

    Ok(())
}
