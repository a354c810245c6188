//! Host collaborators consumed by root growth
//!
//! The engine talks to the world only through these traits: anchors for
//! positions, a scene for the path scaffold and stems, and a scheduler for
//! periodic ticks. `Anchor`, `SceneGraph` and `TimerManager` are the in-crate
//! implementations used by the wasm surface.

mod anchor;
mod scene;
mod timer;

pub use anchor::Anchor;
pub use scene::{SceneGraph, PathRecord, StemRecord, STEM_FLOATS};
pub use timer::{TimerManager, TimerFire};

use crate::math::Vec3;

/// Downstream action started on the target anchor once a root arrives
pub trait Constructable {
    /// Begin the self-sustaining construction process
    fn self_construct(&self);
}

/// A world object a root can grow from or to
pub trait Endpoint {
    fn name(&self) -> &str;

    fn world_position(&self) -> Vec3;

    /// Construction capability, if this endpoint has one
    fn constructable(&self) -> Option<&dyn Constructable> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StemHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Start and end of a stem mesh with their tangents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemPlacement {
    pub start: Vec3,
    pub start_tangent: Vec3,
    pub end: Vec3,
    pub end_tangent: Vec3,
}

impl StemPlacement {
    /// Layout: start(3) + start_tangent(3) + end(3) + end_tangent(3) = 12 floats
    pub fn to_array(&self) -> [f32; 12] {
        [
            self.start.x, self.start.y, self.start.z,
            self.start_tangent.x, self.start_tangent.y, self.start_tangent.z,
            self.end.x, self.end.y, self.end.z,
            self.end_tangent.x, self.end_tangent.y, self.end_tangent.z,
        ]
    }
}

/// Scene graph owning the visual path and stems
pub trait Scene {
    /// Create the renderable path scaffold, owned by the named anchor
    fn spawn_path(&mut self, owner: &str) -> PathHandle;

    fn set_path_points(&mut self, path: PathHandle, points: &[Vec3]);

    /// Create an empty stem placed in world space
    fn spawn_stem(&mut self) -> StemHandle;

    fn set_stem_mesh(&mut self, stem: StemHandle, mesh: &str);

    fn set_stem_placement(&mut self, stem: StemHandle, placement: &StemPlacement);
}

/// Periodic timer service
pub trait Scheduler {
    fn schedule_repeating(&mut self, interval: f32) -> TimerHandle;

    /// Cancel a timer. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}
