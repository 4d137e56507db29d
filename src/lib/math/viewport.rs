use super::*;

/// The pixel area the map is drawn into.
pub struct Viewport {
    pub center: Point,
    pub width: u32,
    pub height: u32,
    tile_size: u32,
}

impl Viewport {
    pub fn new(center: Point, width: u32, height: u32, tile_size: u32) -> Self {
        Self {
            center,
            width,
            height,
            tile_size,
        }
    }

    pub fn get_tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Tiles of zoom level `z` needed to cover the viewport.
    pub fn get_tile_boundaries_for_zoom_level(&self, z: u32) -> TileField {
        let px_to_world =
            self.width as f32 / self.get_tile_size() as f32 / 2.0 / 2f32.powi(z as i32);
        let py_to_world =
            self.height as f32 / self.get_tile_size() as f32 / 2.0 / 2f32.powi(z as i32);

        let top_left: TileId =
            global_to_num_space(&(self.center - vector(px_to_world, py_to_world)), z).into();
        let bottom_right: TileId =
            global_to_num_space(&(self.center + vector(px_to_world, py_to_world)), z).into();
        TileField::new(top_left, bottom_right)
    }
}

#[test]
fn get_tile_boundaries_for_8_zoom() {
    let zurich = num_to_global_space(&deg2num(47.3769, 8.5417, 8));
    let viewport = Viewport::new(zurich, 800, 800, 256);
    let tile_field = viewport.get_tile_boundaries_for_zoom_level(8);

    // 800px span 3.125 tiles, so four or five columns and rows depending on the offset.
    assert!(tile_field.contains(&TileId::new(8, 134, 89)));
    assert!((16..=25).contains(&tile_field.len()));
}

#[test]
fn whole_world_at_zoom_zero() {
    let viewport = Viewport::new(point(0.5, 0.5), 800, 600, 256);
    let tile_field = viewport.get_tile_boundaries_for_zoom_level(0);
    assert_eq!(tile_field.iter().collect::<Vec<_>>(), vec![TileId::new(0, 0, 0)]);
}
