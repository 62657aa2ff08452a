use std::path::Path;

use assert2::assert;
use image::RgbImage;

use crate::{
    geometry::{ScreenBlock, ScreenPoint, ScreenSize},
    screen_block::ScreenBlockExt as _,
    util::{BLACK, Colour},
};

/// Grid of linear colours, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    size: ScreenSize,
    pixels: Vec<Colour>,
}

impl Canvas {
    pub fn new(size: ScreenSize) -> Canvas {
        Canvas {
            size,
            pixels: vec![BLACK; (size.x as usize) * (size.y as usize)],
        }
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    pub fn pixels(&self) -> &[Colour] {
        &self.pixels
    }

    fn offset(&self, point: &ScreenPoint) -> usize {
        assert!(point.x < self.size.x && point.y < self.size.y);
        point.y as usize * self.size.x as usize + point.x as usize
    }

    pub fn pixel(&self, point: &ScreenPoint) -> Colour {
        self.pixels[self.offset(point)]
    }

    pub fn set_pixel(&mut self, point: &ScreenPoint, colour: Colour) {
        let offset = self.offset(point);
        self.pixels[offset] = colour;
    }

    /// Copies a tile's pixels, given in the order of `tile.internal_points()`.
    pub fn write_tile(&mut self, tile: &ScreenBlock, pixels: &[Colour]) {
        assert!(tile.area() as usize == pixels.len());
        assert!(tile.max.x <= self.size.x && tile.max.y <= self.size.y);

        let width = tile.width() as usize;
        for (row, y) in (tile.min.y..tile.max.y).enumerate() {
            let start = self.offset(&ScreenPoint::new(tile.min.x, y));
            self.pixels[start..start + width]
                .copy_from_slice(&pixels[row * width..(row + 1) * width]);
        }
    }

    /// 8 bit RGB image, with colour channels clamped to 0-1.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.size.x, self.size.y, |x, y| {
            colour_to_image(self.pixel(&ScreenPoint::new(x, y)))
        })
    }

    /// Saves the canvas, with the format picked from the path's extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }
}

fn channel_to_u8(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Maps a 0-1 colour to a pixel type compatible with the image crate.
pub fn colour_to_image(colour: Colour) -> image::Rgb<u8> {
    image::Rgb([
        channel_to_u8(colour.r),
        channel_to_u8(colour.g),
        channel_to_u8(colour.b),
    ])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::screen_block::ScreenBlockExt;
    use crate::util::WHITE;
    use assert2::assert;
    use std::num::NonZeroU32;
    use test_case::test_case;

    #[test]
    fn new_canvas_is_black() {
        let canvas = Canvas::new(ScreenSize::new(10, 20));
        assert!(canvas.size() == ScreenSize::new(10, 20));
        assert!(canvas.pixels().len() == 200);
        assert!(canvas.pixels().iter().all(|c| *c == BLACK));
    }

    #[test]
    fn writing_pixels() {
        let mut canvas = Canvas::new(ScreenSize::new(10, 20));
        let red = Colour::new(1.0, 0.0, 0.0);
        canvas.set_pixel(&ScreenPoint::new(2, 3), red);
        assert!(canvas.pixel(&ScreenPoint::new(2, 3)) == red);
        assert!(canvas.pixel(&ScreenPoint::new(3, 2)) == BLACK);
    }

    #[test]
    #[should_panic]
    fn pixel_outside_canvas() {
        Canvas::new(ScreenSize::new(4, 4)).pixel(&ScreenPoint::new(4, 0));
    }

    #[test]
    fn tiles_cover_canvas_exactly() {
        let size = ScreenSize::new(7, 5);
        let mut canvas = Canvas::new(size);
        let tiles = ScreenBlock::from_size(size).tile_ordering(NonZeroU32::new(3).unwrap());
        for tile in &tiles {
            let pixels: Vec<_> = tile
                .internal_points()
                .map(|p| Colour::new(p.x as f64, p.y as f64, 1.0))
                .collect();
            canvas.write_tile(tile, &pixels);
        }

        for point in ScreenBlock::from_size(size).internal_points() {
            assert!(canvas.pixel(&point) == Colour::new(point.x as f64, point.y as f64, 1.0));
        }
    }

    #[test]
    #[should_panic]
    fn tile_with_wrong_pixel_count() {
        let mut canvas = Canvas::new(ScreenSize::new(4, 4));
        let tile = ScreenBlock::new(ScreenPoint::new(0, 0), ScreenPoint::new(2, 2));
        canvas.write_tile(&tile, &[WHITE; 3]);
    }

    #[test_case(-0.5, 0)]
    #[test_case(0.0, 0)]
    #[test_case(0.5, 128)]
    #[test_case(1.0, 255)]
    #[test_case(1.5, 255)]
    fn channels_are_clamped(value: f64, expected: u8) {
        assert!(channel_to_u8(value) == expected);
    }

    #[test]
    fn conversion_to_image() {
        let mut canvas = Canvas::new(ScreenSize::new(3, 2));
        canvas.set_pixel(&ScreenPoint::new(2, 1), Colour::new(1.0, 0.5, 0.0));
        let image = canvas.to_image();
        assert!(image.dimensions() == (3, 2));
        assert!(*image.get_pixel(2, 1) == image::Rgb([255, 128, 0]));
        assert!(*image.get_pixel(0, 0) == image::Rgb([0, 0, 0]));
    }
}
