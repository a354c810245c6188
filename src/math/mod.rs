pub mod vec3;
pub mod path;

pub use vec3::Vec3;
pub use path::{GrowthPath, FALLBACK_DIRECTION};
