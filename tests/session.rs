use countries::*;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

type Answer = (Duration, Result<Vec<CountryRecord>, FetchError>);

/// Answers queries from a fixed script. Unknown queries get a 404 like the real API.
#[derive(Default)]
struct Scripted {
    answers: HashMap<Query, Answer>,
}

impl Scripted {
    fn answer(self, query: Query, records: Vec<CountryRecord>) -> Self {
        self.delayed(query, Duration::from_millis(0), records)
    }

    fn delayed(mut self, query: Query, delay: Duration, records: Vec<CountryRecord>) -> Self {
        self.answers.insert(query, (delay, Ok(records)));
        self
    }

    fn fail(mut self, query: Query, error: FetchError) -> Self {
        self.answers
            .insert(query, (Duration::from_millis(0), Err(error)));
        self
    }

    fn session(self) -> Session {
        self.session_with(LookupSettings::default())
    }

    fn session_with(self, settings: LookupSettings) -> Session {
        Session::new(Arc::new(self), MapSettings::default(), settings)
    }
}

impl CountrySource for Scripted {
    fn fetch(&self, query: &Query) -> Result<Vec<CountryRecord>, FetchError> {
        match self.answers.get(query) {
            Some((delay, result)) => {
                sleep(*delay);
                result.clone()
            }
            None => Err(FetchError::NotFound(404)),
        }
    }
}

fn country(name: &str, region: &str, latlng: [f64; 2]) -> CountryRecord {
    let code = name[..2].to_lowercase();
    serde_json::from_value(json!({
        "name": { "common": name, "official": name },
        "flags": {
            "svg": format!("https://flagcdn.com/{}.svg", code),
            "png": format!("https://flagcdn.com/w320/{}.png", code)
        },
        "currencies": { "XXX": { "name": format!("{} money", name), "symbol": "¤" } },
        "population": 12_345_678,
        "languages": { "aaa": "First", "bbb": "Second" },
        "region": region,
        "capital": [format!("{} City", name)],
        "latlng": latlng
    }))
    .unwrap()
}

fn peru() -> CountryRecord {
    serde_json::from_value(json!({
        "name": { "common": "Peru", "official": "Republic of Peru" },
        "flags": { "svg": "https://flagcdn.com/pe.svg", "png": "https://flagcdn.com/w320/pe.png" },
        "currencies": { "PEN": { "name": "Peruvian sol", "symbol": "S/ " } },
        "population": 32971846,
        "languages": { "aym": "Aymara", "que": "Quechua", "spa": "Spanish" },
        "region": "Americas",
        "capital": ["Lima"],
        "latlng": [-10.0, -76.0]
    }))
    .unwrap()
}

#[test]
fn name_search_shows_the_country_and_one_marker() {
    let mut session = Scripted::default()
        .answer(Query::name("peru"), vec![peru()])
        .session();

    session.search("  Peru ");
    assert_eq!(session.input_state(), InputState::Busy);
    assert!(session.settle(TIMEOUT));

    let detail = session.page().panel.detail().unwrap();
    assert_eq!(detail.name, "Peru");
    assert_eq!(detail.currency, "Peruvian sol");
    assert_eq!(detail.population, "33.0");
    assert_eq!(detail.languages, "Aymara, Quechua, Spanish");
    assert_eq!(detail.region, "Americas");

    let marker = session.map().marker().unwrap();
    assert_eq!(marker.position, LatLng::new(-10.0, -76.0));
    assert_eq!(marker.popup, "Peru, Lima");
    assert_eq!(session.map().zoom(), 5);

    assert_eq!(session.input(), "");
    assert_eq!(session.input_state(), InputState::Locked);
    assert!(session.page().reset_visible);
}

#[test]
fn unknown_name_shows_an_error_and_keeps_the_map() {
    let mut session = Scripted::default().session();

    session.search("atlantis");
    assert!(session.settle(TIMEOUT));

    assert_eq!(
        session.page().panel.errors(),
        &["Something went wrong: Country not found (404). Try again!".to_string()]
    );
    assert!(session.page().panel.detail().is_none());
    assert!(session.map().marker().is_none());
    assert_eq!(session.map().center(), LatLng::ORIGIN);
    assert_eq!(session.input(), "");
    assert_eq!(session.input_state(), InputState::Ready);
    assert!(session.page().reset_visible);
}

#[test]
fn errors_accumulate_until_a_country_is_shown() {
    let mut session = Scripted::default()
        .fail(Query::name("bad"), FetchError::Parse("expected value".into()))
        .fail(Query::name("offline"), FetchError::Network("connection refused".into()))
        .answer(Query::name("peru"), vec![peru()])
        .session();

    session.search("bad");
    assert!(session.settle(TIMEOUT));
    session.search("offline");
    assert!(session.settle(TIMEOUT));
    assert_eq!(session.page().panel.errors().len(), 2);
    assert!(session.page().panel.errors()[1].contains("connection refused"));

    session.search("peru");
    assert!(session.settle(TIMEOUT));
    assert!(session.page().panel.errors().is_empty());
    assert_eq!(session.page().panel.detail().unwrap().name, "Peru");
}

#[test]
fn region_lists_every_country_and_a_click_shows_one() {
    let europe = vec![
        country("France", "Europe", [46.0, 2.0]),
        country("Spain", "Europe", [40.0, -4.0]),
        country("Italy", "Europe", [42.8, 12.8]),
    ];
    let mut session = Scripted::default()
        .answer(Query::region("europe"), europe)
        .session();

    session.select_continent(Some(Continent::Europe));
    assert!(session.settle(TIMEOUT));

    let entries = session.page().list.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].name, "Spain");
    assert_eq!(entries[1].flag, "https://flagcdn.com/w320/sp.png");
    assert!(session.map().marker().is_none());
    assert_eq!(session.input_state(), InputState::Locked);

    assert!(session.click_entry(1));
    assert!(session.page().list.is_empty());
    assert_eq!(session.page().panel.detail().unwrap().name, "Spain");
    assert_eq!(
        session.map().marker().unwrap().position,
        LatLng::new(40.0, -4.0)
    );

    // The entries are gone, so is their click handler.
    assert!(!session.click_entry(1));
    assert_eq!(session.page().panel.detail().unwrap().name, "Spain");
}

#[test]
fn empty_continent_only_clears_the_list() {
    let mut session = Scripted::default().session();

    session.select_continent(None);
    assert!(!session.in_flight());
    assert_eq!(session.page(), &Page::new());
}

#[test]
fn a_second_continent_supersedes_the_first() {
    let mut session = Scripted::default()
        .delayed(
            Query::region("europe"),
            Duration::from_millis(300),
            vec![
                country("France", "Europe", [46.0, 2.0]),
                country("Spain", "Europe", [40.0, -4.0]),
            ],
        )
        .answer(
            Query::region("asia"),
            vec![country("Japan", "Asia", [36.0, 138.0])],
        )
        .session();

    session.select_continent(Some(Continent::Europe));
    session.select_continent(Some(Continent::Asia));
    assert!(session.settle(TIMEOUT));

    // Let the slow answer arrive, it must not be applied.
    sleep(Duration::from_millis(600));
    assert!(!session.poll());

    let names: Vec<_> = session
        .page()
        .list
        .entries()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Japan"]);
}

#[test]
fn reset_returns_to_the_initial_state() {
    let mut session = Scripted::default()
        .answer(Query::name("peru"), vec![peru()])
        .session();

    session.search("peru");
    assert!(session.settle(TIMEOUT));
    assert_eq!(session.input_state(), InputState::Locked);

    session.reset();

    assert_eq!(session.page(), &Page::new());
    assert!(session.map().marker().is_none());
    assert_eq!(session.map().center(), LatLng::ORIGIN);
    assert_eq!(session.map().zoom(), 2);
    assert_eq!(session.input(), "");
    assert_eq!(session.input_state(), InputState::Ready);
}

#[test]
fn a_late_answer_after_reset_is_ignored() {
    let mut session = Scripted::default()
        .delayed(Query::name("peru"), Duration::from_millis(200), vec![peru()])
        .session();

    session.search("peru");
    session.reset();
    assert!(!session.in_flight());

    sleep(Duration::from_millis(500));
    assert!(!session.poll());
    assert_eq!(session.page(), &Page::new());
    assert!(session.map().marker().is_none());
}

#[test]
fn locked_inputs_ignore_events() {
    let mut session = Scripted::default()
        .answer(Query::name("peru"), vec![peru()])
        .session();

    session.search("peru");
    assert!(session.settle(TIMEOUT));

    session.key_down(Key::Char('x'));
    session.select_continent(Some(Continent::Asia));

    assert_eq!(session.input(), "");
    assert!(!session.in_flight());
    assert_eq!(session.page().panel.detail().unwrap().name, "Peru");
}

#[test]
fn typing_edits_the_input_and_blank_searches_are_skipped() {
    let mut session = Scripted::default().session();

    session.key_down(Key::Char('p'));
    session.key_down(Key::Char('x'));
    session.key_down(Key::Backspace);
    assert_eq!(session.input(), "p");

    let mut session = Scripted::default().session();
    session.search("   ");
    assert!(!session.in_flight());
    assert!(session.page().panel.is_empty());
}

#[test]
fn ambiguous_names_pick_exact_then_first() {
    let india = country("India", "Asia", [20.0, 77.0]);
    let biot = country("British Indian Ocean Territory", "Africa", [-6.0, 71.5]);

    let mut session = Scripted::default()
        .answer(Query::name("ind"), vec![biot.clone(), india.clone()])
        .answer(Query::name("india"), vec![biot, india])
        .session();

    session.search("ind");
    assert!(session.settle(TIMEOUT));
    assert_eq!(
        session.page().panel.detail().unwrap().name,
        "British Indian Ocean Territory"
    );

    session.reset();
    session.search("India");
    assert!(session.settle(TIMEOUT));
    assert_eq!(session.page().panel.detail().unwrap().name, "India");
    assert_eq!(
        session.map().marker().unwrap().position,
        LatLng::new(20.0, 77.0)
    );
}

#[test]
fn ambiguous_names_can_be_listed() {
    let mut session = Scripted::default()
        .answer(
            Query::name("guinea"),
            vec![
                country("Guinea-Bissau", "Africa", [12.0, -15.0]),
                country("Equatorial Guinea", "Africa", [2.0, 10.0]),
                country("Papua New Guinea", "Oceania", [-6.0, 147.0]),
            ],
        )
        .session_with(LookupSettings { disambiguate: true });

    session.search("guinea");
    assert!(session.settle(TIMEOUT));

    assert_eq!(session.page().list.len(), 3);
    assert!(session.page().panel.detail().is_none());
    assert!(session.map().marker().is_none());

    assert!(session.click_entry(2));
    assert_eq!(session.page().panel.detail().unwrap().name, "Papua New Guinea");
}

#[test]
fn an_empty_answer_is_reported() {
    let mut session = Scripted::default()
        .answer(Query::name("nowhere"), vec![])
        .session();

    session.search("nowhere");
    assert!(session.settle(TIMEOUT));
    assert_eq!(
        session.page().panel.errors(),
        &["Something went wrong: No country matches \"nowhere\". Try again!".to_string()]
    );
}

#[test]
fn a_continent_over_a_running_name_search_clears_the_input() {
    let mut session = Scripted::default()
        .delayed(Query::name("peru"), Duration::from_millis(200), vec![peru()])
        .answer(
            Query::region("asia"),
            vec![country("Japan", "Asia", [36.0, 138.0])],
        )
        .session();

    session.search("peru");
    assert_eq!(session.input(), "peru");

    session.select_continent(Some(Continent::Asia));
    assert!(session.settle(TIMEOUT));

    sleep(Duration::from_millis(400));
    assert!(!session.poll());

    assert_eq!(session.input(), "");
    assert!(session.page().panel.detail().is_none());
    assert_eq!(session.page().list.len(), 1);
}
