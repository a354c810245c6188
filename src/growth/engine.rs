//! Root growth state machine
//!
//! Grows a chain of stems along a straight path between two anchors:
//! - the path is rebuilt from the anchors' positions on every start
//! - one stem at a time is extended, its end lerped by growth alpha
//! - finished stems are left in the scene and the next one starts
//! - reaching the target starts its construction and notifies listeners

use std::rc::{Rc, Weak};
use super::config::GrowthConfig;
use super::signal::{CompletionSignal, ListenerId};
use crate::error::{Result, RootError};
use crate::host::{Endpoint, PathHandle, Scene, Scheduler, StemHandle, StemPlacement, TimerHandle};
use crate::math::GrowthPath;

/// Lifecycle of a single root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthState {
    /// No anchors bound
    Idle,
    /// Anchors bound, not growing
    Ready,
    /// Timer active, stems advancing
    Growing,
    /// Reached the target; completion has been broadcast
    Completed,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not growing; the tick was ignored
    Inactive,
    /// The current stem was extended
    Growing,
    /// The current stem finished and was released
    StemFinished { stem_distance: f32 },
    /// The root reached its target
    Completed,
    /// An anchor or the path went away; growth stopped without completing
    Aborted,
}

/// Placement of the stem starting at `stem_distance`, drawn `alpha` of the way to its full length
pub fn stem_placement(path: &GrowthPath, stem_distance: f32, segment_length: f32, alpha: f32) -> StemPlacement {
    let start = path.point_at_distance(stem_distance);
    let start_tangent = path.direction_at_distance(stem_distance);
    let end_full = path.point_at_distance(stem_distance + segment_length);
    let end_tangent = path.direction_at_distance(stem_distance + segment_length);

    StemPlacement {
        start,
        start_tangent,
        end: start.lerp(&end_full, alpha),
        end_tangent,
    }
}

/// One root growing from a main anchor to a target anchor
pub struct RootGrowth {
    config: GrowthConfig,
    /// Replacement tunables, applied by the next successful start
    pending_config: Option<GrowthConfig>,
    main: Option<Weak<dyn Endpoint>>,
    target: Option<Weak<dyn Endpoint>>,
    /// Renderable path owned by the scene
    scaffold: Option<PathHandle>,
    path: Option<GrowthPath>,
    state: GrowthState,
    /// Stems finished this run; `stem_distance` is derived from it so it stays a whole multiple
    stems_done: u32,
    growth_alpha: f32,
    current_stem: Option<StemHandle>,
    timer: Option<TimerHandle>,
    completed: CompletionSignal<RootGrowth>,
}

impl Default for RootGrowth {
    fn default() -> Self {
        Self::new(GrowthConfig::default())
    }
}

impl std::fmt::Debug for RootGrowth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootGrowth")
            .field("state", &self.state)
            .field("stems_done", &self.stems_done)
            .field("growth_alpha", &self.growth_alpha)
            .field("current_stem", &self.current_stem)
            .field("timer", &self.timer)
            .field("listeners", &self.completed.len())
            .finish()
    }
}

impl RootGrowth {
    pub fn new(config: GrowthConfig) -> Self {
        Self {
            config,
            pending_config: None,
            main: None,
            target: None,
            scaffold: None,
            path: None,
            state: GrowthState::Idle,
            stems_done: 0,
            growth_alpha: 0.0,
            current_stem: None,
            timer: None,
            completed: CompletionSignal::default(),
        }
    }

    /// Bind both anchors and create the path scaffold in the scene.
    ///
    /// A growing root is stopped before rebinding.
    pub fn initialize(
        &mut self,
        main: Weak<dyn Endpoint>,
        target: Weak<dyn Endpoint>,
        scene: &mut dyn Scene,
        scheduler: &mut dyn Scheduler,
    ) -> Result<()> {
        let (main_anchor, target_anchor) = match (main.upgrade(), target.upgrade()) {
            (Some(m), Some(t)) => (m, t),
            (None, _) => return Err(warn_failure("initialize", RootError::InvalidEndpoint("main"))),
            (_, None) => return Err(warn_failure("initialize", RootError::InvalidEndpoint("target"))),
        };

        if self.state == GrowthState::Growing {
            self.stop_growing(scheduler);
        }

        self.main = Some(main);
        self.target = Some(target);
        self.path = None;
        self.reset_growth();
        let scaffold = match self.scaffold {
            Some(scaffold) => {
                scene.set_path_points(scaffold, &[]);
                scaffold
            }
            None => scene.spawn_path(main_anchor.name()),
        };
        self.scaffold = Some(scaffold);
        self.state = GrowthState::Ready;

        log::info!(
            "Root initialized: main={}, target={}",
            main_anchor.name(),
            target_anchor.name()
        );
        Ok(())
    }

    /// Rebuild the path from the anchors' current positions and start ticking.
    ///
    /// Restarting while growing abandons the in-progress stem.
    pub fn start_growing(&mut self, scene: &mut dyn Scene, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.try_start(scene, scheduler)
            .map_err(|e| warn_failure("start_growing", e))
    }

    fn try_start(&mut self, scene: &mut dyn Scene, scheduler: &mut dyn Scheduler) -> Result<()> {
        let scaffold = match (self.state, self.scaffold) {
            (GrowthState::Idle, _) | (_, None) => return Err(RootError::NotInitialized),
            (_, Some(scaffold)) => scaffold,
        };
        self.pending_config.as_ref().unwrap_or(&self.config).validate()?;

        let main = upgrade(&self.main).ok_or(RootError::InvalidEndpoint("main"))?;
        let target = upgrade(&self.target).ok_or(RootError::InvalidEndpoint("target"))?;

        let start = main.world_position();
        let end = target.world_position();
        for (anchor, position) in [(&main, start), (&target, end)] {
            if !position.is_finite() {
                return Err(RootError::NonFinitePosition {
                    endpoint: anchor.name().to_string(),
                });
            }
        }

        log::info!("Starting root growth from {} to {}", main.name(), target.name());

        // Drop the previous run's timer and stem
        self.halt(scheduler);

        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }

        let path = GrowthPath::between(start, end);
        scene.set_path_points(scaffold, path.points());
        log::info!(
            "Path built from {} to {} with length: {}",
            start,
            end,
            path.total_length()
        );
        self.path = Some(path);

        self.reset_growth();
        self.timer = Some(scheduler.schedule_repeating(self.config.tick_interval));
        self.state = GrowthState::Growing;
        log::info!("Growth timer started");
        Ok(())
    }

    /// Advance growth by `elapsed` seconds. Called by the host when this root's timer fires.
    pub fn tick(&mut self, elapsed: f32, scene: &mut dyn Scene, scheduler: &mut dyn Scheduler) -> TickOutcome {
        if self.state != GrowthState::Growing {
            return TickOutcome::Inactive;
        }

        let target = upgrade(&self.main).and(upgrade(&self.target));
        let length = self.path.as_ref().map(GrowthPath::total_length);
        let (target, length) = match (target, length) {
            (Some(target), Some(length)) => (target, length),
            _ => {
                log::warn!("Root tick: invalid state, stopping growth");
                self.stop_growing(scheduler);
                return TickOutcome::Aborted;
            }
        };

        let stem_distance = self.stem_distance();
        if length <= stem_distance + self.config.segment_length {
            return self.complete(&*target, scheduler);
        }

        let stem = match self.current_stem {
            Some(stem) => stem,
            None => self.spawn_stem(scene),
        };

        if let Some(path) = self.path.as_ref() {
            let placement = stem_placement(
                path,
                stem_distance,
                self.config.segment_length,
                self.growth_alpha,
            );
            scene.set_stem_placement(stem, &placement);
        }

        self.growth_alpha += self.config.growth_rate * elapsed.max(0.0);

        let outcome = if self.growth_alpha >= 1.0 {
            self.growth_alpha = 0.0;
            self.stems_done += 1;
            self.current_stem = None;
            log::info!("Completed root stem, moving to distance: {}", self.stem_distance());
            TickOutcome::StemFinished {
                stem_distance: self.stem_distance(),
            }
        } else {
            TickOutcome::Growing
        };

        log::debug!(
            "Root growth tick - distance: {}, alpha: {}, path length: {}",
            self.stem_distance(),
            self.growth_alpha,
            length
        );
        outcome
    }

    /// Cancel the growth timer. The partially drawn stem stays as last placed.
    pub fn stop_growing(&mut self, scheduler: &mut dyn Scheduler) {
        self.halt(scheduler);
        if self.state == GrowthState::Growing {
            self.state = GrowthState::Ready;
        }
    }

    /// Register a listener called once each time the root reaches its target
    pub fn on_completed(&mut self, listener: impl FnMut(&RootGrowth) + 'static) -> ListenerId {
        self.completed.connect(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.completed.disconnect(id)
    }

    pub fn state(&self) -> GrowthState {
        self.state
    }

    pub fn is_growing(&self) -> bool {
        self.state == GrowthState::Growing
    }

    /// Distance along the path covered by finished stems
    pub fn stem_distance(&self) -> f32 {
        self.stems_done as f32 * self.config.segment_length
    }

    pub fn stems_done(&self) -> u32 {
        self.stems_done
    }

    pub fn growth_alpha(&self) -> f32 {
        self.growth_alpha
    }

    pub fn current_stem(&self) -> Option<StemHandle> {
        self.current_stem
    }

    /// Active timer, used by the host to route fires to `tick`
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn scaffold(&self) -> Option<PathHandle> {
        self.scaffold
    }

    pub fn path(&self) -> Option<&GrowthPath> {
        self.path.as_ref()
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    /// Replace the tunables. Takes effect on the next start.
    pub fn set_config(&mut self, config: GrowthConfig) {
        self.pending_config = Some(config);
    }

    /// Overall progress along the path (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        match (self.state, self.path.as_ref()) {
            (GrowthState::Completed, _) => 1.0,
            (GrowthState::Idle, _) | (_, None) => 0.0,
            (_, Some(path)) if path.total_length() <= 0.0 => 0.0,
            (_, Some(path)) => {
                let grown = self.stem_distance() + self.growth_alpha.min(1.0) * self.config.segment_length;
                (grown / path.total_length()).clamp(0.0, 1.0)
            }
        }
    }

    fn complete(&mut self, target: &dyn Endpoint, scheduler: &mut dyn Scheduler) -> TickOutcome {
        log::info!("Root growth completed to {}", target.name());
        self.halt(scheduler);
        self.state = GrowthState::Completed;

        match target.constructable() {
            Some(construction) => {
                construction.self_construct();
                log::info!("Started self construction on {}", target.name());
            }
            None => log::warn!("No construction capability found on {}", target.name()),
        }

        // Listeners only see `&RootGrowth`, so they cannot reach the list while it is taken
        let mut signal = std::mem::take(&mut self.completed);
        signal.broadcast(self);
        self.completed = signal;

        TickOutcome::Completed
    }

    fn spawn_stem(&mut self, scene: &mut dyn Scene) -> StemHandle {
        let stem = scene.spawn_stem();
        match self.config.mesh.as_deref() {
            Some(mesh) => {
                scene.set_stem_mesh(stem, mesh);
                log::debug!("Set root mesh: {}", mesh);
            }
            None => log::warn!("No root mesh configured"),
        }
        log::info!("Created new root stem at distance: {}", self.stem_distance());
        self.current_stem = Some(stem);
        stem
    }

    fn halt(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
            log::info!("Growth timer stopped");
        }
        self.current_stem = None;
    }

    fn reset_growth(&mut self) {
        self.stems_done = 0;
        self.growth_alpha = 0.0;
        self.current_stem = None;
    }
}

fn upgrade(anchor: &Option<Weak<dyn Endpoint>>) -> Option<Rc<dyn Endpoint>> {
    anchor.as_ref().and_then(Weak::upgrade)
}

fn warn_failure(op: &str, err: RootError) -> RootError {
    log::warn!("Roots::{}: {}", op, err);
    err
}
