use crate::config::CONFIG;
use crate::stats::Stats;
use countries::*;
use std::sync::Arc;

pub enum Flow {
    Continue,
    Quit,
}

pub struct AppState {
    pub session: Session,
    pub stats: Stats,
}

impl AppState {
    pub fn new() -> Self {
        let source = Arc::new(RestCountries::new(CONFIG.api.clone()));
        Self {
            session: Session::new(source, CONFIG.map.clone(), CONFIG.lookup.clone()),
            stats: Stats::new(),
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Flow {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                return Flow::Continue;
            }
        };
        log::trace!("Handling {:?}", command);

        match command {
            Command::Search(text) => {
                if !self.session.input_state().enabled() {
                    println!("The inputs are disabled, :reset to search again.");
                    return Flow::Continue;
                }
                self.session.search(&text);
            }
            Command::Continent(continent) => {
                if !self.session.input_state().enabled() {
                    println!("The inputs are disabled, :reset to search again.");
                    return Flow::Continue;
                }
                self.session.select_continent(continent);
            }
            Command::Pick(index) => {
                if !self.session.click_entry(index) {
                    println!("There is no entry {}.", index + 1);
                    return Flow::Continue;
                }
            }
            Command::Reset => {
                self.session.reset();
                self.stats = Stats::new();
            }
            Command::Map => {
                print!("{}", self.session.map());
                for url in self.session.map().tile_urls() {
                    println!("  {}", url);
                }
                return Flow::Continue;
            }
            Command::Stats => {
                println!("{}", self.stats);
                return Flow::Continue;
            }
            Command::Help => {
                println!("{}", HELP);
                return Flow::Continue;
            }
            Command::Quit => return Flow::Quit,
        }
        self.paint();
        Flow::Continue
    }

    pub fn handle_completion(&mut self, completion: Completion) {
        let elapsed = completion.elapsed;
        let applied = self.session.handle_completion(completion);
        self.stats.capture_lookup(elapsed, !applied);
        if applied {
            self.paint();
        }
    }

    pub fn paint(&self) {
        println!();
        print!("{}", self.session);
        if CONFIG.general.print_map {
            print!("{}", self.session.map());
        }
    }
}

#[test]
fn reset_forgets_the_stats() {
    let mut app_state = AppState::new();
    app_state
        .stats
        .capture_lookup(std::time::Duration::from_millis(120), false);
    assert_eq!(app_state.stats.get_last(), Some(120));

    app_state.handle_line(":reset");

    assert_eq!(app_state.stats.get_last(), None);
    assert_eq!(app_state.stats.get_average(), 0.0);
    assert_eq!(app_state.session.page(), &Page::new());
}
