pub mod camera;
pub mod canvas;
pub mod demo;
pub mod geometry;
pub mod intersections;
pub mod renderer;
pub mod scene;
pub mod screen_block;
pub mod shading;
pub mod util;
pub mod world;

pub use crate::renderer::{RenderManager, RenderProgress, RenderSettings, WorkerCount, render_single_threaded};
pub use camera::Camera;
pub use canvas::Canvas;
pub use world::World;
