mod light;
mod material;
mod pattern;

pub use light::{AreaLight, Light, PointLight};
pub use material::Material;
pub use pattern::{Pattern, PatternKind};
