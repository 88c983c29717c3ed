use anyhow::{Result, anyhow};
use log::{debug, error, info};
use pico_args::Arguments;
use std::{env, io, path::PathBuf};

use crate::config::{Profile, ProfileStore};
use crate::coordinator::{Coordinator, PointerEvent};
use crate::input;
use crate::params::ParameterStore;
use crate::publisher::{JsonLinesPublisher, StatePublisher, TextPublisher, ViewState};

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    // No args -> general help
    if env::args().len() == 1 {
        print_help();
        return Ok(());
    }

    if pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    let subcmd = pargs.subcommand()?;

    match subcmd.as_deref() {
        Some("help") => {
            let topic: Option<String> = pargs.opt_free_from_str()?;
            match topic {
                Some(t) => print_subcmd_help(&t),
                None => print_help(),
            }
            Ok(())
        }

        Some("replay") => {
            let json = pargs.contains("--json");
            let profile = load_profile(&mut pargs)?;
            let path: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: viewgest replay <trace> [--profile NAME | --config PATH] [--json]"))?;
            let events = input::load_trace(&path)?;
            info!("replaying {} events from {}", events.len(), path.display());

            let out = io::stdout().lock();
            let last = if json {
                replay(events, &profile, JsonLinesPublisher::new(out))
            } else {
                replay(events, &profile, TextPublisher::new(out))
            };
            info!(
                "final state: {}, {}",
                last.css_transform(),
                last.css_filter()
            );
            Ok(())
        }

        Some("profiles") => {
            let store = ProfileStore::open_default()?;
            println!("profiles in {}:", store.profiles_dir.display());
            for name in store.list_profiles() {
                println!("  {name}");
            }
            Ok(())
        }

        Some("show-config") => {
            let profile = load_profile(&mut pargs)?;
            print!("{}", toml::to_string_pretty(&profile)?);

            let store = ParameterStore::new(&profile.limits, &profile.surface);
            let pan = store.pan();
            println!("\n# derived");
            println!("# pan.x = {} in [{}, {}]", pan.x.value(), pan.x.min(), pan.x.max());
            println!("# pan.y = {} in [{}, {}]", pan.y.value(), pan.y.min(), pan.y.max());
            println!("# zoom = {} in [{}, {}]", store.zoom().value(), store.zoom().min(), store.zoom().max());
            println!(
                "# brightness = {} in [{}, {}]",
                store.brightness().value(),
                store.brightness().min(),
                store.brightness().max()
            );
            Ok(())
        }

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

/// `--config PATH` wins over `--profile NAME`; falls back to the default profile.
fn load_profile(pargs: &mut Arguments) -> Result<Profile> {
    let config: Option<PathBuf> = pargs.opt_value_from_str("--config")?;
    let name: Option<String> = pargs.opt_value_from_str("--profile")?;

    let profile = match config {
        Some(path) => Profile::load_file(&path)?,
        None => {
            let store = ProfileStore::open_default()?;
            store.load(name.as_deref().unwrap_or("default"))?
        }
    };
    info!("using profile '{}'", profile.display_name());
    Ok(profile)
}

/// Feeds every event through a fresh coordinator; a failing event is
/// logged and the replay continues with the next one.
fn replay<P: StatePublisher>(
    events: Vec<PointerEvent>,
    profile: &Profile,
    publisher: P,
) -> ViewState {
    let mut coordinator = Coordinator::new(profile, publisher);
    for (i, ev) in events.into_iter().enumerate() {
        if let Err(e) = coordinator.handle(ev) {
            error!("event {} ({ev:?}) dropped: {e}", i + 1);
        }
    }
    debug!(
        "replay done: {} pointers still active, session {:?}, listening={}",
        coordinator.active_count(),
        coordinator
            .session()
            .map(|s| (s.kind(), s.reference_distance(), s.reference_angle())),
        coordinator.is_listening()
    );
    coordinator.store().snapshot()
}

fn print_help() {
    println!(
        r#"viewgest — pan / pinch-zoom / twist-brightness gesture engine

USAGE:
  viewgest help [command]                 Show general or command-specific help
  viewgest replay <trace> [options]       Run a recorded pointer trace and print each state
  viewgest profiles                       List installed profiles
  viewgest show-config [options]          Print the effective profile

OPTIONS:
  --profile <name>                        Profile from the profiles directory (default: default)
  --config <path>                         Profile file to load instead
  --json                                  (replay) Emit JSON lines instead of labels

TIPS:
  - Log verbosity: RUST_LOG=debug viewgest replay trace.jsonl
  - Trace lines: {{"kind":"down","id":1,"x":0,"y":0}}  kinds: down move up cancel dblclick dismiss
"#
    );
}

fn print_subcmd_help(cmd: &str) {
    match cmd {
        "replay" => println!(
            "usage: viewgest replay <trace> [--profile NAME | --config PATH] [--json]\nFeeds a JSON-lines pointer trace through the gesture engine."
        ),
        "profiles" => println!("usage: viewgest profiles\nLists profiles; installs default.toml on first use."),
        "show-config" => println!(
            "usage: viewgest show-config [--profile NAME | --config PATH]\nPrints the profile with defaults filled in."
        ),
        _ => {
            eprintln!("unknown command: {cmd}\n");
            print_help();
        }
    }
}
