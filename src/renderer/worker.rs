use crate::{
    camera::Camera, geometry::ScreenBlock, screen_block::ScreenBlockExt as _, util::Colour,
    world::World,
};

/// Traces one ray per pixel of the tile.
/// Pixels are returned in the order of `tile.internal_points()`.
pub fn render_tile(world: &World, camera: &Camera, tile: &ScreenBlock, max_depth: u32) -> Vec<Colour> {
    tile.internal_points()
        .map(|point| world.colour_at(&camera.ray_for_pixel(&point), max_depth))
        .collect()
}
