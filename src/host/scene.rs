use super::{PathHandle, Scene, StemHandle, StemPlacement};
use crate::math::Vec3;

/// Floats per stem in `SceneGraph::stem_data`
pub const STEM_FLOATS: usize = 12;

/// Path scaffold as last mirrored from the engine
#[derive(Debug, Clone, Default)]
pub struct PathRecord {
    pub owner: String,
    pub points: Vec<Vec3>,
}

/// A stem as last placed. Stems stay in the scene after the engine releases them.
#[derive(Debug, Clone, Default)]
pub struct StemRecord {
    pub mesh: Option<String>,
    pub placement: Option<StemPlacement>,
}

/// Retained scene that owns every path and stem it creates
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    paths: Vec<PathRecord>,
    stems: Vec<StemRecord>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self, handle: PathHandle) -> Option<&PathRecord> {
        self.paths.get(handle.0 as usize)
    }

    pub fn paths(&self) -> &[PathRecord] {
        &self.paths
    }

    pub fn stem(&self, handle: StemHandle) -> Option<&StemRecord> {
        self.stems.get(handle.0 as usize)
    }

    pub fn stems(&self) -> &[StemRecord] {
        &self.stems
    }

    /// Flattened placements of every placed stem for upload to a renderer
    pub fn stem_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.stems.len() * STEM_FLOATS);
        for placement in self.stems.iter().filter_map(|s| s.placement.as_ref()) {
            data.extend_from_slice(&placement.to_array());
        }
        data
    }
}

impl Scene for SceneGraph {
    fn spawn_path(&mut self, owner: &str) -> PathHandle {
        self.paths.push(PathRecord {
            owner: owner.to_string(),
            points: Vec::new(),
        });
        PathHandle(self.paths.len() as u32 - 1)
    }

    fn set_path_points(&mut self, path: PathHandle, points: &[Vec3]) {
        match self.paths.get_mut(path.0 as usize) {
            Some(record) => record.points = points.to_vec(),
            None => log::warn!("set_path_points: unknown path {:?}", path),
        }
    }

    fn spawn_stem(&mut self) -> StemHandle {
        self.stems.push(StemRecord::default());
        StemHandle(self.stems.len() as u32 - 1)
    }

    fn set_stem_mesh(&mut self, stem: StemHandle, mesh: &str) {
        match self.stems.get_mut(stem.0 as usize) {
            Some(record) => record.mesh = Some(mesh.to_string()),
            None => log::warn!("set_stem_mesh: unknown stem {:?}", stem),
        }
    }

    fn set_stem_placement(&mut self, stem: StemHandle, placement: &StemPlacement) {
        match self.stems.get_mut(stem.0 as usize) {
            Some(record) => record.placement = Some(*placement),
            None => log::warn!("set_stem_placement: unknown stem {:?}", stem),
        }
    }
}
