mod machinery;
mod thread_pool;
mod worker;

use std::num::{NonZeroU32, NonZeroUsize};

use thiserror::Error;

pub use crate::renderer::machinery::{RenderManager, render_single_threaded};
pub use crate::renderer::thread_pool::{TaskError, TaskHandle, TaskQueue, ThreadPool};
pub use crate::renderer::worker::render_tile;

pub const DEFAULT_TILE_SIZE: NonZeroU32 = NonZeroU32::new(64).unwrap();
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Number of threads in the render pool.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WorkerCount {
    /// One worker per logical CPU.
    #[default]
    Auto,
    Manual(NonZeroUsize),
}

impl WorkerCount {
    pub fn get(&self) -> usize {
        match self {
            WorkerCount::Auto => num_cpus::get().max(1),
            WorkerCount::Manual(count) => count.get(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    pub tile_size: NonZeroU32,
    /// Maximum number of reflection and refraction bounces.
    pub max_depth: u32,
    pub workers: WorkerCount,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            tile_size: DEFAULT_TILE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            workers: WorkerCount::Auto,
        }
    }
}

/// Number of finished and total tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderProgress {
    pub finished: usize,
    pub total: usize,
}

impl RenderProgress {
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * (self.finished as f32) / (self.total as f32)
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to spawn render worker")]
    Spawn(#[from] std::io::Error),
    #[error("Render task failed")]
    Task(#[from] TaskError),
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    #[test]
    fn default_settings() {
        let settings = RenderSettings::default();
        assert!(settings.tile_size.get() == 64);
        assert!(settings.max_depth == 5);
        assert!(settings.workers == WorkerCount::Auto);
    }

    #[test]
    fn worker_counts() {
        assert!(WorkerCount::Auto.get() >= 1);
        assert!(WorkerCount::Manual(NonZeroUsize::new(3).unwrap()).get() == 3);
    }

    #[test]
    fn progress_percent() {
        assert!(RenderProgress { finished: 1, total: 4 }.percent() == 25.0);
        assert!(RenderProgress { finished: 0, total: 0 }.percent() == 100.0);
    }
}
