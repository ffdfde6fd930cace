//! `thunt` - CLI for treasurehunt
//!
//! This binary dispatches the hunt and treasure commands against the
//! flat-file record store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;
use std::io::ErrorKind;

use chrono::{DateTime, Local};
use clap::Parser;
use tracing::warn;

use treasurehunt::cli::{
    prompt, AddCommand, Cli, Command, ListCommand, RemoveHuntCommand, RemoveTreasureCommand,
    ViewCommand,
};
use treasurehunt::{audit, init_logging, Config, Hunt, Store, Treasure, RECORD_SIZE};

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    std::process::exit(0)
                }
                _ => std::process::exit(1),
            }
        }
    };

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Add(cmd) => handle_add(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::View(cmd) => handle_view(&config, &cmd),
        Command::RemoveTreasure(cmd) => handle_remove_treasure(&config, &cmd),
        Command::RemoveHunt(cmd) => handle_remove_hunt(&config, &cmd),
    }
}

fn handle_add(config: &Config, cmd: &AddCommand) -> anyhow::Result<()> {
    let hunt = Hunt::new(config.hunts_root(), &cmd.hunt_id);
    if hunt.ensure_dir()? {
        println!("Created a new hunt directory: {}", hunt.id());
    }

    let store = Store::new(&hunt);
    let id = store.next_id()?;
    let treasure = prompt::prompt_treasure(id)?;
    store.append(&treasure)?;

    log_event(
        &hunt,
        &format!(
            "Added treasure with ID {} by user {}",
            treasure.id, treasure.owner
        ),
    );
    refresh_link(&hunt);

    println!("Treasure has been added with ID: {}", treasure.id);
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let hunt = Hunt::new(config.hunts_root(), &cmd.hunt_id);

    let meta = match fs::metadata(hunt.data_path()) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            println!("Hunt {} has no treasures or doesn't exist.", hunt.id());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let store = Store::new(&hunt);
    if cmd.json {
        let treasures: Vec<Treasure> = store.scan()?.collect::<treasurehunt::Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&treasures)?);
    } else {
        println!("Hunt: {}", hunt.id());
        println!("File size: {} bytes", meta.len());
        if let Ok(modified) = meta.modified() {
            let modified: DateTime<Local> = modified.into();
            println!("Last modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
        }
        println!("Number of treasures: {}", meta.len() / RECORD_SIZE as u64);
        println!();

        for (index, item) in store.scan()?.enumerate() {
            let treasure = item?;
            println!("--- Treasure {} ---", index + 1);
            println!("{treasure}");
            println!();
        }
    }

    log_event(&hunt, "Listed all treasures");
    Ok(())
}

fn handle_view(config: &Config, cmd: &ViewCommand) -> anyhow::Result<()> {
    let hunt = Hunt::new(config.hunts_root(), &cmd.hunt_id);
    let store = Store::new(&hunt);

    match store.get(cmd.treasure_id)? {
        Some(treasure) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&treasure)?);
            } else {
                println!("--- Treasure Details ---");
                println!("{treasure}");
            }
            log_event(
                &hunt,
                &format!("Viewed treasure with ID {}", treasure.id),
            );
        }
        None => {
            println!(
                "Treasure with ID {} not found in hunt {}.",
                cmd.treasure_id,
                hunt.id()
            );
        }
    }
    Ok(())
}

fn handle_remove_treasure(config: &Config, cmd: &RemoveTreasureCommand) -> anyhow::Result<()> {
    let hunt = Hunt::new(config.hunts_root(), &cmd.hunt_id);
    let store = Store::new(&hunt);

    if store.remove(cmd.treasure_id)? {
        println!(
            "Treasure with ID {} removed from hunt {}.",
            cmd.treasure_id,
            hunt.id()
        );
        log_event(
            &hunt,
            &format!("Removed treasure with ID {}", cmd.treasure_id),
        );
        refresh_link(&hunt);
    } else {
        println!(
            "Treasure with ID {} not found in hunt {}.",
            cmd.treasure_id,
            hunt.id()
        );
    }
    Ok(())
}

fn handle_remove_hunt(config: &Config, cmd: &RemoveHuntCommand) -> anyhow::Result<()> {
    let hunt = Hunt::new(config.hunts_root(), &cmd.hunt_id);

    if hunt.remove()? {
        println!("Hunt {} has been removed.", hunt.id());
    } else {
        println!("Hunt {} doesn't exist.", hunt.id());
    }
    Ok(())
}

/// Append an audit log event, best-effort: a logging failure never rolls
/// back the operation it describes.
fn log_event(hunt: &Hunt, message: &str) {
    if let Err(e) = audit::append_event(hunt, message) {
        warn!("could not write audit log for hunt {}: {e}", hunt.id());
    }
}

/// Refresh the discoverable log link, best-effort.
fn refresh_link(hunt: &Hunt) {
    if let Err(e) = audit::refresh_link(hunt) {
        warn!("could not refresh log link for hunt {}: {e}", hunt.id());
    }
}
