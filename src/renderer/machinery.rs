use std::{sync::Arc, time::Instant};

use tracing::info;

use crate::{
    camera::Camera,
    canvas::Canvas,
    geometry::ScreenBlock,
    renderer::{RenderError, RenderProgress, RenderSettings, thread_pool::ThreadPool, worker::render_tile},
    screen_block::ScreenBlockExt as _,
    world::World,
};

/// Renders images tile by tile on a pool of worker threads.
pub struct RenderManager {
    settings: RenderSettings,
    pool: ThreadPool,
}

impl RenderManager {
    /// Starts the worker threads.
    pub fn new(settings: RenderSettings) -> Result<RenderManager, RenderError> {
        let pool = ThreadPool::new(settings.workers)?;
        Ok(RenderManager { settings, pool })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    pub fn render(&self, world: Arc<World>, camera: Arc<Camera>) -> Result<Canvas, RenderError> {
        self.render_with_progress(world, camera, |_| {})
    }

    /// Like `render`, calling `progress` every time a tile is written to the canvas.
    pub fn render_with_progress(
        &self,
        world: Arc<World>,
        camera: Arc<Camera>,
        mut progress: impl FnMut(RenderProgress),
    ) -> Result<Canvas, RenderError> {
        let start = Instant::now();
        let resolution = camera.resolution();
        let tiles = ScreenBlock::from_size(resolution).tile_ordering(self.settings.tile_size);
        info!(
            width = resolution.x,
            height = resolution.y,
            tiles = tiles.len(),
            workers = self.pool.worker_count(),
            "Render started"
        );

        let max_depth = self.settings.max_depth;
        let handles: Vec<_> = tiles
            .into_iter()
            .map(|tile| {
                let world = Arc::clone(&world);
                let camera = Arc::clone(&camera);
                let handle = self
                    .pool
                    .submit(move || render_tile(&world, &camera, &tile, max_depth));
                (tile, handle)
            })
            .collect();

        let total = handles.len();
        let mut canvas = Canvas::new(resolution);
        for (i, (tile, handle)) in handles.into_iter().enumerate() {
            let pixels = handle.wait()?;
            canvas.write_tile(&tile, &pixels);
            progress(RenderProgress {
                finished: i + 1,
                total,
            });
        }

        info!(elapsed = ?start.elapsed(), "Render finished");
        Ok(canvas)
    }
}

/// Renders the whole image on the calling thread.
pub fn render_single_threaded(world: &World, camera: &Camera, max_depth: u32) -> Canvas {
    let full = ScreenBlock::from_size(camera.resolution());
    let mut canvas = Canvas::new(camera.resolution());
    canvas.write_tile(&full, &render_tile(world, camera, &full, max_depth));
    canvas
}
