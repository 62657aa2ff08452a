use std::iter::FusedIterator;
use std::num::NonZeroU32;

use crate::geometry::{ScreenBlock, ScreenPoint, ScreenSize};

pub trait ScreenBlockExt {
    fn from_size(size: ScreenSize) -> Self;
    fn is_empty_or_negative(&self) -> bool;
    fn area(&self) -> u32;
    fn contains(&self, point: &ScreenPoint) -> bool;
    fn internal_points(&self) -> InternalPoints;
    fn tile_ordering(&self, tile_size: NonZeroU32) -> Vec<ScreenBlock>;
}

impl ScreenBlockExt for ScreenBlock {
    fn from_size(size: ScreenSize) -> Self {
        ScreenBlock::new(ScreenPoint::origin(), ScreenPoint::new(size.x, size.y))
    }

    fn is_empty_or_negative(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    fn area(&self) -> u32 {
        if self.is_empty_or_negative() {
            0
        } else {
            self.width() * self.height()
        }
    }

    fn contains(&self, point: &ScreenPoint) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Create an iterator over coordinates (x, y) pairs inside the block,
    /// in C order (x changes first, then y)
    fn internal_points(&self) -> InternalPoints {
        if self.is_empty_or_negative() {
            InternalPoints::empty()
        } else {
            InternalPoints {
                min_x: self.min.x,
                max: self.max,

                cursor: self.min,
            }
        }
    }

    /// Splits the block into tiles in row major order.
    /// Tiles are tile_size * tile_size large, except on the bottom and right side of the
    /// block, where they are clipped if tile size doesn't evenly divide block size.
    fn tile_ordering(&self, tile_size: NonZeroU32) -> Vec<ScreenBlock> {
        if self.is_empty_or_negative() {
            return Vec::new();
        }

        let tile_size = tile_size.get();
        let mut tiles = Vec::with_capacity(
            (self.width().div_ceil(tile_size) * self.height().div_ceil(tile_size)) as usize,
        );
        for y in (self.min.y..self.max.y).step_by(tile_size as usize) {
            for x in (self.min.x..self.max.x).step_by(tile_size as usize) {
                tiles.push(ScreenBlock::new(
                    ScreenPoint::new(x, y),
                    ScreenPoint::new(
                        x.saturating_add(tile_size).min(self.max.x),
                        y.saturating_add(tile_size).min(self.max.y),
                    ),
                ));
            }
        }
        tiles
    }
}

#[derive(Copy, Clone, Debug)]
pub struct InternalPoints {
    min_x: u32,
    max: ScreenPoint,

    cursor: ScreenPoint,
}

impl InternalPoints {
    // Construct an iterator over internal points that returns no points
    fn empty() -> Self {
        InternalPoints {
            min_x: 1,
            max: ScreenPoint::origin(),

            cursor: ScreenPoint::origin(),
        }
    }
}

impl Iterator for InternalPoints {
    type Item = ScreenPoint;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.y >= self.max.y {
            return None;
        }

        let ret = self.cursor;

        debug_assert!(self.cursor.x < self.max.x);
        self.cursor.x += 1;
        if self.cursor.x >= self.max.x {
            self.cursor.x = self.min_x;
            self.cursor.y += 1;
        }

        Some(ret)
    }
}

impl ExactSizeIterator for InternalPoints {
    fn len(&self) -> usize {
        if self.cursor.y >= self.max.y {
            0
        } else {
            let whole_rows = ScreenBlock::new(ScreenPoint::new(self.min_x, self.cursor.y + 1), self.max);
            let current_row = ScreenBlock::new(self.cursor, ScreenPoint::new(self.max.x, self.cursor.y + 1));
            (whole_rows.area() + current_row.area()) as usize
        }
    }
}

impl FusedIterator for InternalPoints {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::test::ScreenBlockWrapper;
    use assert2::assert;
    use test_strategy::proptest;

    fn check_exact_length_internal<T: Iterator + ExactSizeIterator>(
        iterator: &T,
        expected_length: usize,
    ) {
        assert!(iterator.len() == expected_length);
        let (min, max) = iterator.size_hint();
        assert!(min == expected_length);
        assert!(max == Some(expected_length));
    }

    /// Goes through the whole iterator and checks that at every step iterator's size hint is equal
    /// to its reported length and equal to the expected number of elements.
    fn check_exact_length<T: Iterator + ExactSizeIterator>(
        mut iterator: T,
        expected_length: usize,
    ) {
        check_exact_length_internal(&iterator, expected_length);

        let mut count = 0usize;
        while iterator.next().is_some() {
            count += 1;
            check_exact_length_internal(&iterator, expected_length - count);
        }
    }

    /// Check that all pixels in the block are covered exactly once by a pixel iterator
    fn check_pixel_iterator_covers_block<T: Iterator<Item = ScreenPoint>>(
        pixel_iterator: T,
        block: ScreenBlock,
    ) {
        let mut vec = vec![false; block.area() as usize];
        for p in pixel_iterator {
            assert!(block.contains(&p));
            let index = (p.x - block.min.x) + (p.y - block.min.y) * block.width();
            assert!(!vec[index as usize]);
            vec[index as usize] = true;
        }
        assert!(vec.into_iter().all(|v| v));
    }

    #[proptest]
    fn pixel_iterator_covers_all(block: ScreenBlockWrapper) {
        check_pixel_iterator_covers_block(block.internal_points(), *block);
    }

    #[proptest]
    fn pixel_iterator_exact_length(block: ScreenBlockWrapper) {
        check_exact_length(block.internal_points(), block.area() as usize);
    }

    /// Pixels of all tiles together cover the block exactly once
    #[proptest]
    fn tiles_cover_all(block: ScreenBlockWrapper, #[strategy(1u32..40)] tile_size: u32) {
        let tile_size = NonZeroU32::new(tile_size).unwrap();
        check_pixel_iterator_covers_block(
            block
                .tile_ordering(tile_size)
                .into_iter()
                .flat_map(|tile| tile.internal_points()),
            *block,
        );
    }

    #[proptest]
    fn tiles_are_row_major(block: ScreenBlockWrapper, #[strategy(1u32..40)] tile_size: u32) {
        let tiles = block.tile_ordering(NonZeroU32::new(tile_size).unwrap());
        for (a, b) in tiles.iter().zip(tiles.iter().skip(1)) {
            assert!((a.min.y, a.min.x) < (b.min.y, b.min.x));
        }
    }

    #[test]
    fn edge_tiles_shrink() {
        let block = ScreenBlock::from_size(ScreenSize::new(10, 5));
        let tiles = block.tile_ordering(NonZeroU32::new(4).unwrap());
        assert!(tiles.len() == 6);
        assert!(tiles[0] == ScreenBlock::new(ScreenPoint::new(0, 0), ScreenPoint::new(4, 4)));
        assert!(tiles[2] == ScreenBlock::new(ScreenPoint::new(8, 0), ScreenPoint::new(10, 4)));
        assert!(tiles[5] == ScreenBlock::new(ScreenPoint::new(8, 4), ScreenPoint::new(10, 5)));
    }

    #[test]
    fn empty_block_has_no_tiles() {
        let block = ScreenBlock::from_size(ScreenSize::new(0, 5));
        assert!(block.tile_ordering(NonZeroU32::new(4).unwrap()).is_empty());
        assert!(block.internal_points().next().is_none());
    }
}
