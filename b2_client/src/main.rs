//! A console client for a Big Two table.
//!
//! The client connects to a dealer over TCP, takes the seat it is given and
//! plays from commands typed on stdin.

use anyhow::{Context, Result};
use b2_client::{
    commands::{Command, HELP, parse_command},
    console::{ConsoleObserver, render_hand, render_table},
};
use big_two::{Client, ClientConfig, ConnectionError, NetError};
use log::{info, warn};
use pico_args::Arguments;
use std::{
    io::{self, BufRead},
    net::SocketAddr,
    sync::Arc,
};

const USAGE: &str = "\
Join a Big Two table

USAGE:
  b2_client [OPTIONS]

OPTIONS:
  --server IP:PORT      Dealer address  [default: $BIG_TWO_SERVER or 127.0.0.1:2396]
  --name NAME           Player name     [default: $BIG_TWO_NAME]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server: Option<SocketAddr>,
    name: Option<String>,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{USAGE}");
        std::process::exit(0);
    }

    let args = Args {
        server: pargs
            .opt_value_from_str("--server")
            .context("--server must be IP:PORT")?,
        name: pargs.opt_value_from_str("--name")?,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = ClientConfig::from_env(args.server, args.name)?;
    config.validate()?;
    info!("Playing as {} against {}", config.player_name, config.server);

    let client = Client::new(config, Arc::new(ConsoleObserver));
    if let Err(error) = client.connect() {
        println!("Couldn't connect: {error}. Type 'connect' to try again.");
    }

    run(&client)
}

fn run(client: &Client) -> Result<()> {
    println!("{HELP}");
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };
        let result = match command {
            Command::Play(indices) => client.make_move(Some(indices)),
            Command::Pass => client.make_move(None),
            Command::Chat(text) => client.send_chat(&text),
            Command::Hand => {
                print!("{}", render_hand(&client.snapshot()));
                Ok(())
            }
            Command::Table => {
                print!("{}", render_table(&client.snapshot()));
                Ok(())
            }
            Command::Connect => client.connect(),
            Command::Quit => {
                // Leaving while disconnected is fine.
                let _ = client.quit();
                return Ok(());
            }
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
        };
        if let Err(error) = result {
            report(&error);
        }
    }
    // Stdin closed.
    let _ = client.quit();
    Ok(())
}

fn report(error: &NetError) {
    match error {
        // Already reported through the observer.
        NetError::Connection(ConnectionError::AlreadyConnected) => {}
        NetError::Connection(_) => println!("{error}. Type 'connect' to reconnect."),
        _ => warn!("{error}"),
    }
}
