mod app_state;
mod config;
mod stats;

use crate::app_state::{AppState, Flow};
use crate::config::CONFIG;
use crossbeam_channel::{select, unbounded};
use std::io::BufRead;

fn main() {
    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter_level(CONFIG.general.log_level.to_level_filter());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    let (tx, lines) = unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Unable to read from stdin. Reason:\r\n{}", e);
                    break;
                }
            }
        }
    });

    let mut app_state = AppState::new();
    let completions = app_state.session.completions().clone();

    println!("Search a country by name, or pick a continent with :continent <name>. :help lists all commands.");
    app_state.paint();

    loop {
        select! {
            recv(lines) -> line => match line {
                Ok(line) => {
                    if let Flow::Quit = app_state.handle_line(&line) {
                        break;
                    }
                }
                // stdin closed, let the running lookup finish first
                Err(_) => {
                    while app_state.session.in_flight() {
                        match completions.recv() {
                            Ok(completion) => app_state.handle_completion(completion),
                            Err(_) => break,
                        }
                    }
                    break;
                }
            },
            recv(completions) -> completion => {
                if let Ok(completion) = completion {
                    app_state.handle_completion(completion);
                }
            }
        }
    }
}
