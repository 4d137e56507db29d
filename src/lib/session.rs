use super::*;
use serde_derive::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The options of the continent dropdown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Continent {
    Africa,
    Americas,
    Antarctic,
    Asia,
    Europe,
    Oceania,
}

impl Continent {
    pub const ALL: [Continent; 6] = [
        Continent::Africa,
        Continent::Americas,
        Continent::Antarctic,
        Continent::Asia,
        Continent::Europe,
        Continent::Oceania,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Americas => "Americas",
            Continent::Antarctic => "Antarctic",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Continent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Continent::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// A key pressed while the country input has focus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    /// Offer all matches of an ambiguous name search as a list instead of picking the first.
    pub disambiguate: bool,
}

/// One page session: the inputs, the rendered page, the map and the running lookup.
pub struct Session {
    page: Page,
    map: MapView,
    input: String,
    lookups: Lookups,
    map_settings: MapSettings,
    settings: LookupSettings,
}

impl Session {
    pub fn new(
        source: Arc<dyn CountrySource>,
        map_settings: MapSettings,
        settings: LookupSettings,
    ) -> Self {
        Self {
            page: Page::new(),
            map: MapView::new(map_settings.clone()),
            input: String::new(),
            lookups: Lookups::new(source),
            map_settings,
            settings,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Current content of the country input.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_state(&self) -> InputState {
        InputState::derive(self.page.result_displayed(), self.lookups.in_flight())
    }

    pub fn in_flight(&self) -> bool {
        self.lookups.in_flight()
    }

    /// Completions of running lookups, to be fed back through `handle_completion`.
    pub fn completions(&self) -> &crossbeam_channel::Receiver<Completion> {
        self.lookups.completions()
    }

    /// A key event on the country input. Every key clears the list, Enter searches.
    pub fn key_down(&mut self, key: Key) {
        if !self.input_state().enabled() {
            log::debug!("Ignoring {:?}, the inputs are disabled", key);
            return;
        }
        match key {
            Key::Char(c) => self.input.push(c),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Enter => {
                let term = self.input.clone();
                self.submit_name(&term);
            }
        }
        self.page.list.clear();
    }

    /// Type `text` into the country input and press Enter.
    pub fn search(&mut self, text: &str) {
        for c in text.chars() {
            self.key_down(Key::Char(c));
        }
        self.key_down(Key::Enter);
    }

    /// Look up a country by name.
    pub fn submit_name(&mut self, term: &str) {
        let query = Query::name(term);
        if query.term().is_empty() {
            log::debug!("Not searching for an empty name");
            return;
        }
        self.lookups.issue(query);
    }

    /// A change of the continent dropdown. `None` is the empty option.
    pub fn select_continent(&mut self, continent: Option<Continent>) {
        if !self.input_state().enabled() {
            log::debug!("Ignoring continent selection, the inputs are disabled");
            return;
        }
        self.page.list.clear();
        if let Some(continent) = continent {
            if let Some(Query::Name(term)) = self.lookups.current_query() {
                log::debug!("Name lookup for \"{}\" superseded, clearing the input", term);
                self.input.clear();
            }
            self.lookups.issue(Query::region(continent.name()));
            self.page.panel.clear();
        }
    }

    /// Click the flag of list entry `index`: show it, then empty the list.
    ///
    /// Returns `false` if there is no such entry.
    pub fn click_entry(&mut self, index: usize) -> bool {
        match self.page.list.take(index) {
            Some(entry) => {
                self.show_country(&entry.record);
                true
            }
            None => false,
        }
    }

    /// Back to the state of a fresh start. Running lookups can no longer touch the page.
    pub fn reset(&mut self) {
        log::debug!("Resetting the session");
        self.lookups.invalidate();
        self.page = Page::new();
        self.map = MapView::new(self.map_settings.clone());
        self.input.clear();
    }

    /// Apply a completion to the page. Returns `false` if it was stale.
    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        let completion = match self.lookups.accept(completion) {
            Some(completion) => completion,
            None => return false,
        };
        log::debug!(
            "Lookup {} for {} settled after {:?}",
            completion.id,
            completion.query,
            completion.elapsed
        );

        let records = match completion.result {
            Ok(records) => Some(records),
            Err(e) => {
                log::warn!("Lookup for {} failed. Reason:\r\n{}", completion.query, e);
                self.page.render_error(&e);
                None
            }
        };
        self.page.reset_visible = true;

        match completion.query {
            Query::Name(term) => {
                if let Some(records) = records {
                    self.show_matches(&term, records);
                }
                self.input.clear();
            }
            Query::Region(_) => {
                for record in records.iter().flatten() {
                    self.page.render_list_entry(record);
                }
            }
        }
        true
    }

    /// Apply every completion that already arrived. Returns `true` if the page changed.
    pub fn poll(&mut self) -> bool {
        let arrived: Vec<_> = self.completions().try_iter().collect();
        arrived
            .into_iter()
            .fold(false, |changed, c| self.handle_completion(c) || changed)
    }

    /// Block until the current lookup settled or `timeout` passed.
    ///
    /// Returns `false` on timeout.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.lookups.in_flight() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.completions().recv_timeout(remaining) {
                Ok(completion) => {
                    self.handle_completion(completion);
                }
                Err(_) => return false,
            }
        }
        true
    }

    fn show_matches(&mut self, term: &str, records: Vec<CountryRecord>) {
        if let Some(exact) = records.iter().find(|r| r.matches_name(term)) {
            self.show_country(exact);
        } else if self.settings.disambiguate && records.len() > 1 {
            log::debug!("{} countries match \"{}\", listing them", records.len(), term);
            for record in &records {
                self.page.render_list_entry(record);
            }
        } else if let Some(first) = records.first() {
            self.show_country(first);
        } else {
            self.page.render_error(&FetchError::NoMatch(term.to_string()));
        }
    }

    fn show_country(&mut self, record: &CountryRecord) {
        match record.coordinates() {
            Some(coords) => self.map.display(coords, record),
            None => log::warn!(
                "{} has no coordinates, not placing a marker",
                record.common_name()
            ),
        }
        self.page.render_country(record);
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.page)?;
        if self.in_flight() {
            writeln!(f, "Loading...")?;
        }
        if self.page.reset_visible {
            writeln!(f, "(:reset to start over)")?;
        }
        Ok(())
    }
}

#[test]
fn continents_parse_case_insensitively() {
    assert_eq!("europe".parse::<Continent>(), Ok(Continent::Europe));
    assert_eq!(" AMERICAS ".parse::<Continent>(), Ok(Continent::Americas));
    assert_eq!("Atlantis".parse::<Continent>(), Err("Atlantis".to_string()));
}
