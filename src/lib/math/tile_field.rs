use super::*;

/// A rectangle of tiles on one zoom level, corners inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TileField {
    pub topleft: TileId,
    pub bottomright: TileId,
}

impl TileField {
    pub fn new(topleft: TileId, bottomright: TileId) -> Self {
        Self {
            topleft,
            bottomright,
        }
    }

    pub fn iter(&self) -> TileIterator {
        TileIterator {
            tile_field: self,
            current_tile: Some(self.topleft),
        }
    }

    pub fn contains(&self, tile_id: &TileId) -> bool {
        tile_id.z == self.topleft.z
            && (self.topleft.x..=self.bottomright.x).contains(&tile_id.x)
            && (self.topleft.y..=self.bottomright.y).contains(&tile_id.y)
    }

    pub fn len(&self) -> usize {
        let w = self.bottomright.x - self.topleft.x + 1;
        let h = self.bottomright.y - self.topleft.y + 1;
        (w * h) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Walks a `TileField` row by row.
pub struct TileIterator<'a> {
    tile_field: &'a TileField,
    current_tile: Option<TileId>,
}

impl<'a> Iterator for TileIterator<'a> {
    type Item = TileId;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.current_tile?;
        let field = self.tile_field;
        self.current_tile = if c.x < field.bottomright.x {
            Some(TileId::new(c.z, c.x + 1, c.y))
        } else if c.y < field.bottomright.y {
            Some(TileId::new(c.z, field.topleft.x, c.y + 1))
        } else {
            None
        };
        Some(c)
    }
}

#[test]
fn iterates_row_by_row() {
    let field = TileField::new(TileId::new(3, 1, 1), TileId::new(3, 2, 2));
    let tiles: Vec<_> = field.iter().collect();
    assert_eq!(
        tiles,
        vec![
            TileId::new(3, 1, 1),
            TileId::new(3, 2, 1),
            TileId::new(3, 1, 2),
            TileId::new(3, 2, 2),
        ]
    );
    assert_eq!(field.len(), 4);
    assert!(field.contains(&TileId::new(3, 2, 1)));
    assert!(!field.contains(&TileId::new(3, 3, 1)));
    assert!(!field.contains(&TileId::new(4, 2, 1)));
}

#[test]
fn single_tile_field() {
    let field = TileField::new(TileId::new(0, 0, 0), TileId::new(0, 0, 0));
    assert_eq!(field.iter().count(), 1);
}
