use super::*;
use std::fmt;

/// The rendered detail fragment of one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryDetail {
    pub flag: String,
    pub name: String,
    pub currency: String,
    pub population: String,
    pub languages: String,
    pub region: String,
}

impl From<&CountryRecord> for CountryDetail {
    fn from(record: &CountryRecord) -> Self {
        Self {
            flag: record.flags.svg.clone(),
            name: record.common_name().to_string(),
            currency: record.primary_currency().unwrap_or("-").to_string(),
            population: record.population_millions(),
            languages: record.language_list(),
            region: record.region.clone(),
        }
    }
}

impl fmt::Display for CountryDetail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  Flag:        {}", self.flag)?;
        writeln!(f, "  Name:        {}", self.name)?;
        writeln!(f, "  Currency:    {}", self.currency)?;
        writeln!(f, "  Population:  {} million", self.population)?;
        writeln!(f, "  Language(s): {}", self.languages)?;
        writeln!(f, "  Region:      {}", self.region)
    }
}

/// The detail panel. Holds at most one country and any error lines appended after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPanel {
    detail: Option<CountryDetail>,
    errors: Vec<String>,
    visible: bool,
}

impl DetailPanel {
    /// Replace the whole panel content with `record`.
    pub fn render(&mut self, record: &CountryRecord) {
        self.detail = Some(record.into());
        self.errors.clear();
        self.visible = true;
    }

    /// Append an error line, keeping whatever is shown already.
    pub fn render_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.visible = true;
    }

    pub fn clear(&mut self) {
        self.detail = None;
        self.errors.clear();
    }

    pub fn detail(&self) -> Option<&CountryDetail> {
        self.detail.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.detail.is_none() && self.errors.is_empty()
    }
}

impl fmt::Display for DetailPanel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(detail) = &self.detail {
            write!(f, "{}", detail)?;
        }
        for error in &self.errors {
            writeln!(f, "  {}", error)?;
        }
        Ok(())
    }
}

/// One entry of the country list. Clicking it shows the country it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub flag: String,
    pub name: String,
    pub record: CountryRecord,
}

impl From<&CountryRecord> for ListEntry {
    fn from(record: &CountryRecord) -> Self {
        Self {
            flag: record.flags.png.clone(),
            name: record.common_name().to_string(),
            record: record.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryList {
    entries: Vec<ListEntry>,
}

impl CountryList {
    pub fn append(&mut self, record: &CountryRecord) {
        self.entries.push(record.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove every entry, handing back the one at `index`.
    pub fn take(&mut self, index: usize) -> Option<ListEntry> {
        if index < self.entries.len() {
            self.entries.drain(..).nth(index)
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for CountryList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "  [{:>3}] {}  <{}>", i + 1, entry.name, entry.flag)?;
        }
        Ok(())
    }
}

/// Whether the inputs accept events.
///
/// Derived from what the page shows and whether a lookup is running, never stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputState {
    /// Nothing displayed, nothing running.
    Ready,
    /// A lookup is running. A new one supersedes it.
    Busy,
    /// A result is displayed. Only a reset unlocks the inputs.
    Locked,
}

impl InputState {
    pub fn derive(result_displayed: bool, lookup_in_flight: bool) -> Self {
        match (result_displayed, lookup_in_flight) {
            (true, _) => InputState::Locked,
            (false, true) => InputState::Busy,
            (false, false) => InputState::Ready,
        }
    }

    pub fn enabled(self) -> bool {
        self != InputState::Locked
    }
}

/// Everything the page shows besides the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub panel: DetailPanel,
    pub list: CountryList,
    pub reset_visible: bool,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_country(&mut self, record: &CountryRecord) {
        self.panel.render(record);
        self.reset_visible = true;
    }

    pub fn render_list_entry(&mut self, record: &CountryRecord) {
        self.list.append(record);
        self.reset_visible = true;
    }

    pub fn render_error(&mut self, error: &FetchError) {
        self.panel
            .render_error(format!("Something went wrong: {}. Try again!", error));
    }

    /// A country detail or a list is showing.
    pub fn result_displayed(&self) -> bool {
        self.panel.detail().is_some() || !self.list.is_empty()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.panel.is_visible() && !self.panel.is_empty() {
            writeln!(f, "Country:")?;
            write!(f, "{}", self.panel)?;
        }
        if !self.list.is_empty() {
            writeln!(f, "Countries ({}):", self.list.len())?;
            write!(f, "{}", self.list)?;
        }
        Ok(())
    }
}

#[test]
fn detail_render_replaces() {
    let mut page = Page::new();
    let germany = country::germany();

    page.render_error(&FetchError::NotFound(404));
    page.render_country(&germany);
    page.render_country(&germany);

    assert!(page.panel.errors().is_empty());
    assert_eq!(
        page.panel.detail(),
        Some(&CountryDetail {
            flag: "https://flagcdn.com/de.svg".into(),
            name: "Germany".into(),
            currency: "Euro".into(),
            population: "83.2".into(),
            languages: "German".into(),
            region: "Europe".into(),
        })
    );
    assert_eq!(page.to_string().matches("Germany").count(), 1);
}

#[test]
fn errors_are_appended() {
    let mut page = Page::new();
    page.render_error(&FetchError::NotFound(404));
    page.render_error(&FetchError::Network("connection refused".into()));

    assert_eq!(
        page.panel.errors(),
        &[
            "Something went wrong: Country not found (404). Try again!".to_string(),
            "Something went wrong: Request failed: connection refused. Try again!".to_string(),
        ]
    );
    assert!(page.panel.is_visible());
    assert!(!page.result_displayed());
}

#[test]
fn take_clears_the_whole_list() {
    let mut list = CountryList::default();
    let germany = country::germany();
    list.append(&germany);
    list.append(&germany);
    list.append(&germany);

    assert!(list.take(3).is_none());
    assert_eq!(list.len(), 3);

    let entry = list.take(1).unwrap();
    assert_eq!(entry.name, "Germany");
    assert!(list.is_empty());
}

#[test]
fn input_state_is_derived() {
    assert_eq!(InputState::derive(false, false), InputState::Ready);
    assert_eq!(InputState::derive(false, true), InputState::Busy);
    assert_eq!(InputState::derive(true, true), InputState::Locked);
    assert!(InputState::Busy.enabled());
    assert!(!InputState::Locked.enabled());
}
