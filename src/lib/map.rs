use super::*;
use serde_derive::Deserialize;
use std::fmt;

/// Deepest zoom level raster tile servers commonly serve.
pub const MAX_ZOOM: u32 = 19;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub tile_url: String,
    pub attribution: String,
    pub initial_zoom: u32,
    pub focus_zoom: u32,
    pub tile_size: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            tile_url: "https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            initial_zoom: 2,
            focus_zoom: 5,
            tile_size: 256,
            width: 800,
            height: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub popup: String,
}

/// The map widget: one view, one tile layer, at most one marker.
pub struct MapView {
    settings: MapSettings,
    center: LatLng,
    zoom: u32,
    layers: Vec<TileLayer>,
    marker: Option<Marker>,
}

impl MapView {
    /// A map centered on the origin at the initial zoom with the tile layer attached.
    pub fn new(settings: MapSettings) -> Self {
        let zoom = settings.initial_zoom.min(MAX_ZOOM);
        let mut map = Self {
            settings,
            center: LatLng::ORIGIN,
            zoom,
            layers: vec![],
            marker: None,
        };
        map.add_tile_layer();
        map
    }

    /// Center the map. The zoom is clamped to `MAX_ZOOM`.
    pub fn set_view(&mut self, center: LatLng, zoom: u32) {
        self.center = center;
        self.zoom = zoom.min(MAX_ZOOM);
    }

    /// Attach the configured tile layer unless it is already attached.
    pub fn add_tile_layer(&mut self) {
        let layer = TileLayer {
            url_template: self.settings.tile_url.clone(),
            attribution: self.settings.attribution.clone(),
        };
        if !self.layers.contains(&layer) {
            self.layers.push(layer);
        }
    }

    /// Center on `coords` and put the single marker there, showing the record's popup.
    pub fn display(&mut self, coords: LatLng, record: &CountryRecord) {
        self.set_view(coords, self.settings.focus_zoom);
        self.add_tile_layer();

        if let Some(old) = self.marker.take() {
            log::trace!("Removing marker at {}", old.position);
        }
        self.marker = Some(Marker {
            position: coords,
            popup: record.popup_text(),
        });
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn visible_tiles(&self) -> TileField {
        let coordinate = deg2num(self.center.lat as f32, self.center.lng as f32, self.zoom);
        let viewport = Viewport::new(
            num_to_global_space(&coordinate),
            self.settings.width,
            self.settings.height,
            self.settings.tile_size,
        );
        viewport.get_tile_boundaries_for_zoom_level(self.zoom)
    }

    /// URLs of every visible tile, for each attached layer.
    pub fn tile_urls(&self) -> Vec<String> {
        let field = self.visible_tiles();
        self.layers
            .iter()
            .flat_map(|layer| field.iter().map(move |tile| tile.url(&layer.url_template)))
            .collect()
    }
}

impl fmt::Display for MapView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Map: centered at {} (zoom {})", self.center, self.zoom)?;
        match &self.marker {
            Some(marker) => writeln!(f, "  Marker at {}: {}", marker.position, marker.popup)?,
            None => writeln!(f, "  No marker")?,
        }
        for layer in &self.layers {
            writeln!(
                f,
                "  {} tiles from {} ({})",
                self.visible_tiles().len(),
                layer.url_template,
                layer.attribution
            )?;
        }
        Ok(())
    }
}

#[test]
fn starts_at_the_origin() {
    let map = MapView::new(MapSettings::default());
    assert_eq!(map.center(), LatLng::ORIGIN);
    assert_eq!(map.zoom(), 2);
    assert_eq!(map.layers().len(), 1);
    assert!(map.marker().is_none());
}

#[test]
fn display_replaces_the_marker() {
    let mut map = MapView::new(MapSettings::default());
    let germany = country::germany();

    map.display(LatLng::new(10.0, 10.0), &germany);
    map.display(LatLng::new(51.0, 9.0), &germany);

    assert_eq!(map.zoom(), 5);
    assert_eq!(map.center(), LatLng::new(51.0, 9.0));
    assert_eq!(
        map.marker(),
        Some(&Marker {
            position: LatLng::new(51.0, 9.0),
            popup: "Germany, Berlin".into(),
        })
    );
    assert_eq!(map.layers().len(), 1);
}

#[test]
fn lists_visible_tile_urls() {
    let mut map = MapView::new(MapSettings::default());
    map.set_view(LatLng::new(51.0, 9.0), 5);

    let urls = map.tile_urls();
    assert_eq!(urls.len(), map.visible_tiles().len());
    assert!(urls.contains(&"https://tile.openstreetmap.fr/hot/5/16/10.png".to_string()));
}

#[test]
fn zoom_is_clamped() {
    let mut map = MapView::new(MapSettings {
        initial_zoom: 32,
        focus_zoom: 40,
        ..MapSettings::default()
    });
    assert_eq!(map.zoom(), MAX_ZOOM);

    map.display(LatLng::new(51.0, 9.0), &country::germany());
    assert_eq!(map.zoom(), MAX_ZOOM);
    assert!(!map.tile_urls().is_empty());
}
