//! Per-canvas client state and the event handling that drives it.

use crate::commit::{CancelReason, HoldController, HoldPhase, SpawnPolicy};
use crate::config::ClientConfig;
use crate::hint::{Hint, HitMarker};
use crate::instances::{build_batches, InstanceBatch};
use crate::palette::{hex_to_rgb, Palette, MARKER_OWN_TEAM};
use crate::scene::{Frame, SceneSink};
use crate::store::{ReplicatedStore, UpdateState, FORMS};
use crate::trace::{Trace, TraceWorld};
use echoes_core::{Form, FormFields, Params, SphereSet, TeamId, Vec2, Vec3, WalletId};
use input::{PointerButton, PointerEvent, PointerEventKind, PointerState};
use picking::{nearest_hit, PerspectiveCamera, Ray};
use shaping::{shape_radius, BlockReason, RadiusResult};
use std::sync::Arc;
use std::time::Duration;

/// What a commit attempt did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitOutcome {
    /// A create request went out.
    Sent(FormFields),
    /// The store refused the write; nothing is retried.
    Failed,
    /// The hold ended with no placeable hint.
    Ineligible,
}

/// Everything one canvas owns.
pub struct ClientContext {
    params: Params,
    palette: Palette,
    team: TeamId,
    wallet: Option<WalletId>,
    camera: PerspectiveCamera,
    viewport: Vec2,
    /// Swapped whole on every snapshot.
    spheres: Arc<SphereSet>,
    batches: Vec<InstanceBatch>,
    hint: Hint,
    marker: HitMarker,
    hold: HoldController,
    spawn: SpawnPolicy,
    spawn_distance: f32,
    traces: TraceWorld,
    pointers: PointerState,
    needs_render: bool,
}

impl ClientContext {
    pub fn new(config: &ClientConfig, team: TeamId) -> Self {
        let params = config.params.clone();
        let mut camera = PerspectiveCamera::home(&params);
        let viewport = Vec2::new(config.viewport_width as f32, config.viewport_height as f32);
        camera.set_aspect(viewport.x, viewport.y);

        let mut hint = Hint::default();
        hint.color = config.palette.own(team);

        Self {
            spheres: Arc::new(SphereSet::new(params.team_count)),
            hold: HoldController::new(&params),
            palette: config.palette.clone(),
            team,
            wallet: config.wallet.clone(),
            camera,
            viewport,
            batches: Vec::new(),
            hint,
            marker: HitMarker::default(),
            spawn: SpawnPolicy::new(config.spawn_admins.iter().cloned()),
            spawn_distance: config.spawn_distance,
            traces: TraceWorld::new(config.trace_lifetime_secs),
            pointers: PointerState::new(),
            needs_render: true,
            params,
        }
    }

    /// The viewer's team.
    pub fn team(&self) -> TeamId {
        self.team
    }

    /// Wallet the viewer is signed in with.
    pub fn wallet(&self) -> Option<&str> {
        self.wallet.as_deref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Hint under the pointer as last picked.
    pub fn hint(&self) -> &Hint {
        &self.hint
    }

    pub fn marker(&self) -> &HitMarker {
        &self.marker
    }

    /// Current hold gesture phase.
    pub fn hold_phase(&self) -> HoldPhase {
        self.hold.phase()
    }

    /// The current snapshot. Holding it keeps it alive across swaps.
    pub fn spheres(&self) -> Arc<SphereSet> {
        Arc::clone(&self.spheres)
    }

    /// Per-team instance batches for the current snapshot.
    pub fn batches(&self) -> &[InstanceBatch] {
        &self.batches
    }

    /// Traces still waiting for their forms.
    pub fn traces(&self) -> Vec<Trace> {
        self.traces.traces()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Mutable camera access; marks the view dirty.
    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        self.needs_render = true;
        &mut self.camera
    }

    /// Whether anything changed since the last `render`.
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Update viewport size and camera aspect.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.camera.set_aspect(width, height);
        self.needs_render = true;
    }

    /// Return the camera to its home view.
    pub fn recenter(&mut self) {
        self.camera.recenter(&self.params);
        self.needs_render = true;
    }

    /// Handle a store notification by pulling a fresh snapshot.
    pub fn apply_update(&mut self, state: &UpdateState, store: &dyn ReplicatedStore) {
        match store.get_all(FORMS) {
            Some(forms) => self.apply_snapshot(forms, state.active_wallet.clone()),
            None => log::debug!("Update before `{}` is available", FORMS),
        }
    }

    /// Replace the population with `forms`.
    pub fn apply_snapshot(&mut self, forms: Vec<Form>, active_wallet: Option<WalletId>) {
        if active_wallet.is_some() {
            self.wallet = active_wallet;
        }
        let set = SphereSet::rebuild(forms, self.params.team_count);
        self.batches = build_batches(&set, &self.params, &self.palette, self.wallet.as_deref());
        self.traces.reconcile(&set, self.wallet.as_deref());
        log::info!("Snapshot: {} forms (wallet {:?})", set.len(), self.wallet);
        self.spheres = Arc::new(set);

        // The population under the pointer may have changed.
        let position = match self.hold.holder() {
            Some(id) => self.pointers.position(id),
            None => self.pointers.hover_position(),
        };
        if let Some(position) = position {
            self.pointer_moved(position);
        }
        self.needs_render = true;
    }

    /// World ray under a viewport position.
    pub fn ray_at(&self, position: Vec2) -> Ray {
        self.camera.ray_from_pointer(position, self.viewport)
    }

    /// Re-pick and re-shape under the pointer.
    pub fn pointer_moved(&mut self, position: Vec2) {
        let ray = self.ray_at(position);
        self.update_hint(&ray);
    }

    fn update_hint(&mut self, ray: &Ray) {
        self.needs_render = true;
        let spheres = Arc::clone(&self.spheres);
        let Some(hit) = nearest_hit(ray, &spheres, &self.params) else {
            self.hint.hide();
            self.marker.hide();
            return;
        };

        let result = shape_radius(hit.form, hit.point, self.team, &spheres, &self.params);
        let marker_color = match result {
            RadiusResult::Blocked { reason: BlockReason::Foreign, .. } => self.palette.own(self.team),
            _ => hex_to_rgb(MARKER_OWN_TEAM),
        };
        self.marker.show(hit.point, hit.normal(), result.marker_scale(), marker_color);

        match result {
            RadiusResult::Placeable { radius, classification, .. } => {
                let color = self.palette.hint(
                    self.team,
                    self.params.team_count,
                    classification,
                    result.blend_amount(),
                );
                self.hint.show(hit.point, radius, classification, color);
            }
            RadiusResult::Blocked { .. } => self.hint.hide(),
        }
    }

    /// Feed one pointer event at time `now`.
    ///
    /// A hold whose deadline has already passed fires before the event is
    /// looked at, so a late release or drift can't cancel it; the commit's
    /// outcome is returned. While a hold is live only the holding pointer
    /// steers the hint.
    pub fn handle_event(
        &mut self,
        event: &PointerEvent,
        now: Duration,
        store: &mut dyn ReplicatedStore,
    ) -> Option<CommitOutcome> {
        let fired = self.fire_due(now, store);
        self.pointers.process(event);
        let steers_hint = self.hold.holder().map_or(true, |id| id == event.id);
        match event.kind {
            PointerEventKind::Move => {
                if steers_hint {
                    self.pointer_moved(event.position);
                }
                self.hold.moved(event.id, event.position);
            }
            PointerEventKind::Down(PointerButton::Primary) => {
                if steers_hint {
                    self.pointer_moved(event.position);
                    let committable = self.hint.is_committable();
                    self.hold
                        .press(event.id, PointerButton::Primary, event.position, now, committable);
                }
            }
            PointerEventKind::Down(PointerButton::Secondary) => {
                if let Some(outcome) = self.spawn_at(event.position, store) {
                    log::debug!("Instant placement: {:?}", outcome);
                }
            }
            PointerEventKind::Down(_) => {}
            PointerEventKind::Up(button) => {
                self.hold.lifted(event.id, button);
            }
            PointerEventKind::Cancel => {
                self.hold.release(event.id, CancelReason::Cancelled);
            }
            PointerEventKind::Leave => {
                self.hold.release(event.id, CancelReason::Left);
            }
        }
        fired
    }

    /// Per-frame update: fire an elapsed hold and age traces.
    pub fn tick(&mut self, now: Duration, dt: f32, store: &mut dyn ReplicatedStore) -> Option<CommitOutcome> {
        if self.traces.tick(dt) > 0 {
            self.needs_render = true;
        }
        self.fire_due(now, store)
    }

    fn fire_due(&mut self, now: Duration, store: &mut dyn ReplicatedStore) -> Option<CommitOutcome> {
        self.hold.poll(now)?;
        if !self.hint.is_committable() {
            log::debug!("Hold elapsed without a placeable hint");
            return Some(CommitOutcome::Ineligible);
        }
        Some(self.commit(self.hint.position, self.hint.radius, store))
    }

    /// Instant placement for authorised wallets: a maximum-radius form at the
    /// hit point, or `spawn_distance` along the ray when nothing is hit.
    pub fn spawn_at(&mut self, position: Vec2, store: &mut dyn ReplicatedStore) -> Option<CommitOutcome> {
        if !self.spawn.allows(self.wallet.as_deref()) {
            log::warn!("Instant placement refused for wallet {:?}", self.wallet);
            return None;
        }
        let ray = self.ray_at(position);
        let spheres = Arc::clone(&self.spheres);
        let point = nearest_hit(&ray, &spheres, &self.params)
            .map(|hit| hit.point)
            .unwrap_or_else(|| ray.point_at(self.spawn_distance));
        Some(self.commit(point, self.params.max_radius, store))
    }

    fn commit(&mut self, position: Vec3, radius: f32, store: &mut dyn ReplicatedStore) -> CommitOutcome {
        let fields = FormFields::from_render(self.team, position, radius, &self.params);
        self.hint.hide();
        self.needs_render = true;

        if let Err(e) = store.create(FORMS, fields) {
            log::warn!("Create failed, dropping {:?}: {}", fields, e);
            return CommitOutcome::Failed;
        }
        log::info!("Create {:?}", fields);
        self.traces.spawn(Trace {
            position,
            radius: radius * self.params.inner,
            fields,
        });
        CommitOutcome::Sent(fields)
    }

    /// Hand the current frame to `sink` if anything changed since the last one.
    pub fn render(&mut self, sink: &mut dyn SceneSink) -> bool {
        if !self.needs_render {
            return false;
        }
        let traces = self.traces.traces();
        sink.draw(&Frame {
            view_projection: self.camera.view_projection_matrix(),
            batches: &self.batches,
            hint: &self.hint,
            marker: &self.marker,
            traces: &traces,
        });
        self.needs_render = false;
        true
    }
}
