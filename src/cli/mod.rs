pub mod status;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, level_filters::LevelFilter, warn};

use crate::{
    ledger::{
        self,
        actions::{mark_workout_done, save_plan},
        snapshot::Snapshot,
    },
    store::{entities::User, json_store::JsonStore},
    tracker::{self, DEFAULT_REFRESH_INTERVAL},
    utils::{
        clock::{Clock, SystemClock},
        dir::application_state_dir,
        logging::{enable_logging, CLI_PREFIX, WATCH_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Spotter", version, long_about = None)]
#[command(about = "Two-person workout accountability tracker", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        help = "Data directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, help = "Mirror logs to the console")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show today's status for everyone on the roster")]
    Status {
        #[arg(long, help = "Only show this roster member")]
        user: Option<String>,
    },
    #[command(about = "Mark today's workout as done")]
    Done {
        #[arg(help = "What the workout was. Defaults to the saved plan text")]
        description: Option<String>,
        #[arg(long, help = "Acting user. Defaults to the first roster member")]
        user: Option<String>,
    },
    #[command(about = "Save what to do on the next workout day")]
    Plan {
        text: String,
        #[arg(long, help = "Acting user. Defaults to the first roster member")]
        user: Option<String>,
    },
    #[command(about = "Keep refreshing and printing the status block")]
    Watch {
        #[arg(
            long,
            default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs(),
            help = "Refresh interval in seconds"
        )]
        interval: u64,
    },
    #[command(about = "Add someone to the roster")]
    Add {
        name: String,
        #[arg(long, help = "Avatar image reference")]
        avatar: Option<String>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args.dir.map_or_else(application_state_dir, Ok)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let prefix = if matches!(args.commands, Commands::Watch { .. }) {
        WATCH_PREFIX
    } else {
        CLI_PREFIX
    };
    enable_logging(prefix, &app_dir, logging_level, args.log)?;

    let store = JsonStore::new(app_dir.join("tables"))?;
    let clock = SystemClock;

    match args.commands {
        Commands::Status { user } => {
            let snapshot = ledger::refresh(&store, clock.now(), None).await;
            let snapshot = narrow_to_user(snapshot, user.as_deref());
            println!("{}", status::render_status(&snapshot));
            Ok(())
        }
        Commands::Done { description, user } => {
            let snapshot = ledger::refresh(&store, clock.now(), None).await;
            let Some(user) = resolve_user(&snapshot, user.as_deref()).cloned() else {
                return Ok(());
            };
            // Mirrors the original UI: marking done without a description
            // records whatever was planned.
            let description = description
                .unwrap_or_else(|| snapshot.workout_plan_text(user.id).to_owned());
            match mark_workout_done(&store, &snapshot, &user, &description, clock.now()).await {
                Ok(()) => println!("Workout logged for {}. Go flex!", user.name),
                Err(e) => error!("Failed to mark workout done {e:?}"),
            }
            Ok(())
        }
        Commands::Plan { text, user } => {
            let snapshot = ledger::refresh(&store, clock.now(), None).await;
            let Some(user) = resolve_user(&snapshot, user.as_deref()).cloned() else {
                return Ok(());
            };
            match save_plan(&store, &snapshot, &user, &text, clock.now()).await {
                Ok(Some(target)) => {
                    println!("Plan saved for {} on {target}. Now stick to it.", user.name)
                }
                Ok(None) => {}
                Err(e) => error!("Failed to save plan {e:?}"),
            }
            Ok(())
        }
        Commands::Watch { interval } => {
            tracker::start_watch(store, Duration::from_secs(interval)).await
        }
        Commands::Add { name, avatar } => {
            let user = store.add_user(&name, avatar).await?;
            println!("Added {} to the roster", user.name);
            Ok(())
        }
    }
}

/// Limits the status block to one roster member when `--user` is given.
/// An unknown name logs a warning and leaves the full roster in place.
fn narrow_to_user(snapshot: Snapshot, name: Option<&str>) -> Snapshot {
    let Some(name) = name else {
        return snapshot;
    };
    let Some(user) = snapshot.user_named(name).cloned() else {
        warn!("No roster member named {name}, showing everyone");
        return snapshot;
    };
    Snapshot::new(
        snapshot.today,
        vec![user],
        snapshot.logs,
        snapshot.plans,
        snapshot.missed,
    )
}

/// Picks the acting user: a case-insensitive name match when given, else the
/// first roster member in name order. `None` makes the calling action a
/// no-op, matching how the UI ignored actions without a current user.
fn resolve_user<'a>(snapshot: &'a Snapshot, name: Option<&str>) -> Option<&'a User> {
    match name {
        Some(name) => {
            let user = snapshot.user_named(name);
            if user.is_none() {
                warn!("No roster member named {name}, ignoring");
            }
            user
        }
        None => snapshot.users.first(),
    }
}
