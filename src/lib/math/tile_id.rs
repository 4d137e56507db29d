#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct TileId {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Expand a raster tile URL template containing `{z}`, `{x}` and `{y}`.
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

impl From<TileCoordinate> for TileId {
    fn from(value: TileCoordinate) -> Self {
        let max = 2u32.checked_pow(value.z).unwrap_or(u32::MAX).saturating_sub(1) as f32;
        Self {
            z: value.z,
            x: value.x.max(0.0).min(max) as u32,
            y: value.y.max(0.0).min(max) as u32,
        }
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileCoordinate {
    pub z: u32,
    pub x: f32,
    pub y: f32,
}

impl TileCoordinate {
    pub fn new(z: u32, x: f32, y: f32) -> Self {
        Self { z, x, y }
    }
}

#[test]
fn expands_url_templates() {
    let tile = TileId::new(5, 17, 10);
    assert_eq!(
        tile.url("https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png"),
        "https://tile.openstreetmap.fr/hot/5/17/10.png"
    );
    assert_eq!(tile.to_string(), "5/17/10");
}

#[test]
fn coordinates_are_clamped_to_the_world() {
    let tile: TileId = TileCoordinate::new(2, -0.5, 7.2).into();
    assert_eq!(tile, TileId::new(2, 0, 3));
}

#[test]
fn huge_zoom_levels_do_not_overflow() {
    let tile: TileId = TileCoordinate::new(40, 12.0, 7.0).into();
    assert_eq!(tile, TileId::new(40, 12, 7));
}
