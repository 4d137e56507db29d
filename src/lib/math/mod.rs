mod tile_field;
mod tile_id;
mod viewport;

use lyon::math::{point, vector, Point};
use std::f32::consts::PI;

pub use tile_field::*;
pub use tile_id::*;
pub use viewport::*;

/// Web Mercator latitudes beyond this cannot be projected.
pub const MAX_LATITUDE: f32 = 85.051_13;

fn deg2rad(deg: f32) -> f32 {
    2.0 * PI * deg / 360.0
}

pub fn deg2num(lat_deg: f32, lon_deg: f32, zoom: u32) -> TileCoordinate {
    let lat_rad = deg2rad(lat_deg.max(-MAX_LATITUDE).min(MAX_LATITUDE));
    let n = 2f32.powi(zoom as i32);
    let xtile = (lon_deg + 180.0) / 360.0 * n;
    let ytile = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    TileCoordinate::new(zoom, xtile, ytile)
}

pub fn num_to_global_space(coordinate: &TileCoordinate) -> Point {
    point(0.0, 0.0) + vector(coordinate.x, coordinate.y) * 1.0 / 2f32.powi(coordinate.z as i32)
}

pub fn global_to_num_space(point: &Point, z: u32) -> TileCoordinate {
    let p = *point / 2f32.powi(-(z as i32));
    TileCoordinate::new(z, p.x, p.y)
}

#[test]
fn origin_is_the_center_of_the_world() {
    let c = deg2num(0.0, 0.0, 2);
    assert!((c.x - 2.0).abs() < 1e-4);
    assert!((c.y - 2.0).abs() < 1e-4);

    let global = num_to_global_space(&c);
    assert!((global.x - 0.5).abs() < 1e-4);
    assert!((global.y - 0.5).abs() < 1e-4);
}

#[test]
fn zurich_lands_in_its_tile() {
    let tile: TileId = deg2num(47.3769, 8.5417, 8).into();
    assert_eq!(tile, TileId::new(8, 134, 89));
}
