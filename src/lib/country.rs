use serde::de::{Deserializer, MapAccess, Visitor};
use serde_derive::Deserialize;
use std::fmt;
use std::marker::PhantomData;

/// A country record as returned by the REST Countries API.
///
/// Only the fields that get rendered are modelled. Everything is lenient:
/// a record missing an optional field still deserializes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryRecord {
    pub name: CountryName,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default, deserialize_with = "ordered_map")]
    pub currencies: Vec<(String, Currency)>,
    #[serde(default)]
    pub population: u64,
    #[serde(default, deserialize_with = "ordered_map")]
    pub languages: Vec<(String, String)>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub latlng: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub png: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl CountryRecord {
    pub fn common_name(&self) -> &str {
        &self.name.common
    }

    /// Name of the first currency listed for the country, if any.
    pub fn primary_currency(&self) -> Option<&str> {
        self.currencies.first().map(|(_, c)| c.name.as_str())
    }

    /// Population in millions, rounded to one decimal place.
    pub fn population_millions(&self) -> String {
        format!("{:.1}", self.population as f64 / 1_000_000.0)
    }

    pub fn language_list(&self) -> String {
        self.languages
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn capital_list(&self) -> String {
        self.capital.join(",")
    }

    /// The `latlng` pair, or `None` if the API did not deliver two values.
    pub fn coordinates(&self) -> Option<LatLng> {
        match self.latlng[..] {
            [lat, lng, ..] => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    /// Text shown in the map marker popup.
    pub fn popup_text(&self) -> String {
        format!("{}, {}", self.name.common, self.capital_list())
    }

    pub fn matches_name(&self, term: &str) -> bool {
        self.name.common.to_lowercase() == term.trim().to_lowercase()
    }
}

/// A geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const ORIGIN: LatLng = LatLng { lat: 0.0, lng: 0.0 };

    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.lat, self.lng)
    }
}

/// Deserializes a JSON object into a list of pairs, keeping document order.
///
/// The "primary" currency is the first one listed, so a `HashMap` won't do.
fn ordered_map<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    struct OrderedVisitor<T>(PhantomData<T>);

    impl<'de, T: serde::Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}

#[cfg(test)]
pub(crate) fn germany() -> CountryRecord {
    serde_json::from_value(serde_json::json!({
        "name": { "common": "Germany", "official": "Federal Republic of Germany" },
        "flags": { "svg": "https://flagcdn.com/de.svg", "png": "https://flagcdn.com/w320/de.png" },
        "currencies": { "EUR": { "name": "Euro", "symbol": "€" } },
        "population": 83240525,
        "languages": { "deu": "German" },
        "region": "Europe",
        "capital": ["Berlin"],
        "latlng": [51.0, 9.0]
    }))
    .unwrap()
}

#[test]
fn currencies_keep_document_order() {
    let record: CountryRecord = serde_json::from_str(
        r#"{
            "name": { "common": "Zimbabwe" },
            "currencies": {
                "ZWL": { "name": "Zimbabwean dollar" },
                "BWP": { "name": "Botswana pula" },
                "AUD": { "name": "Australian dollar" }
            },
            "languages": { "zib": "Zimbabwean Sign Language", "eng": "English", "bwg": "Chibarwe" }
        }"#,
    )
    .unwrap();

    assert_eq!(record.primary_currency(), Some("Zimbabwean dollar"));
    assert_eq!(
        record.language_list(),
        "Zimbabwean Sign Language, English, Chibarwe"
    );
}

#[test]
fn missing_fields_are_lenient() {
    let record: CountryRecord =
        serde_json::from_str(r#"{ "name": { "common": "Antarctica" } }"#).unwrap();

    assert_eq!(record.primary_currency(), None);
    assert_eq!(record.language_list(), "");
    assert_eq!(record.coordinates(), None);
    assert_eq!(record.population_millions(), "0.0");
}

#[test]
fn formats_rendered_values() {
    let record = germany();
    assert_eq!(record.population_millions(), "83.2");
    assert_eq!(record.coordinates(), Some(LatLng::new(51.0, 9.0)));
    assert_eq!(record.popup_text(), "Germany, Berlin");
    assert!(record.matches_name("  GERMANY "));
    assert!(!record.matches_name("germ"));
}
