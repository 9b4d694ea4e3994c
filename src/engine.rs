//! Engine core: the per-instance state machine that turns pointer, focus and
//! key input into layer transforms.
//!
//! `EngineCore` owns every piece of mutable state (the single tween slot, the
//! hover controller, parallax) and reads geometry through a [`SceneHost`].
//! It never touches the DOM. Every input handler and [`EngineCore::tick`]
//! hand back a list of [`Action`]s for the host to apply, in order.
//!
//! Pointer moves are only queued; the hover rules run once per frame from
//! `tick`, so a burst of moves collapses to one evaluation of the latest.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::config::{HoverZoomOptions, MapOptions, Tuning};
use crate::consts::MIN_MEASURABLE_PX;
use crate::error::InitError;
use crate::frame::{BaseFrameParams, TargetParams, base_frame, region_target};
use crate::geom::{Point, Rect, ViewBox, clamp_pan, try_screen_to_scene};
use crate::host::{Label, LabelId, SceneHost};
use crate::hover::{Decision, HoverController, Phase};
use crate::input::{Key, PointerSample, Target};
use crate::label::{nearest_label, underline_for};
use crate::parallax::Parallax;
use crate::region::{RegionDirectory, RegionId};
use crate::transform::{Transform, Viewport};
use crate::tween::{Completion, Ease};

pub use crate::label::Underline;

/// Writes returned from input handlers and ticks for the host to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Write this pan/zoom to the scene layer.
    SetTransform(Transform),
    /// Toggle the active marker on a region.
    SetRegionActive { region: RegionId, active: bool },
    /// Show the label underline at this segment (layer space).
    ShowUnderline(Underline),
    HideUnderline,
    /// Set a region's accessible name.
    SetRegionAriaLabel { region: RegionId, label: String },
    /// Full top-level navigation to this path.
    Navigate(String),
    /// Cancel the browser's default handling of the current key event.
    SuppressDefault,
}

/// Core engine state. Testable without a browser.
pub struct EngineCore {
    options: HoverZoomOptions,
    tuning: Tuning,
    directory: RegionDirectory,
    view_box: ViewBox,
    /// Scene content bounds in layer space, measured once at init.
    bounds: Option<Rect>,
    base: Transform,
    viewport: Viewport,
    hover: HoverController,
    parallax: Parallax,
}

impl EngineCore {
    /// Measure the scene and place the layer at the idle frame.
    ///
    /// # Errors
    ///
    /// [`InitError::NoRegions`] for an empty directory and
    /// [`InitError::Unmeasurable`] when the host has no usable view box.
    pub fn new<H: SceneHost>(host: &H, directory: RegionDirectory, options: &MapOptions) -> Result<Self, InitError> {
        if directory.is_empty() {
            return Err(InitError::NoRegions);
        }
        let view_box = host.view_box().ok_or(InitError::Unmeasurable)?;
        let bounds = host.scene_bounds().filter(|b| b.is_measurable(MIN_MEASURABLE_PX));
        let hover_options = options.region_hover_options.clone().normalized();
        let tuning = options.tuning.clone();
        let base = base_frame(bounds.as_ref(), &view_box, &BaseFrameParams::new(&tuning, &hover_options));

        Ok(Self {
            options: hover_options,
            tuning,
            directory,
            view_box,
            bounds,
            base,
            viewport: Viewport::new(base),
            hover: HoverController::new(),
            parallax: Parallax::new(),
        })
    }

    /// One-time writes after init: the idle transform, each region's
    /// accessible name, and the key map used by external triggers.
    pub fn setup<H: SceneHost>(&mut self, host: &H) -> Vec<Action> {
        let mut actions = vec![Action::SetTransform(self.base)];
        let labels = host.labels();
        let mount = host.mount_client_rect();
        let ids: Vec<RegionId> = self.directory.ids().collect();

        for id in &ids {
            let Some(label) = nearest_label(host.region_client_rect(*id), &labels, mount).and_then(|l| find_label(&labels, l)) else {
                continue;
            };
            let Some(dest) = self.tuning.catalog.match_label(&label.text) else {
                continue;
            };
            actions.push(Action::SetRegionAriaLabel { region: *id, label: dest.aria_label.clone() });
            self.directory.bind_key(&dest.key, *id);
        }

        let centers: Vec<(RegionId, Point)> = ids
            .iter()
            .filter_map(|id| {
                let bbox = host.region_bbox(*id).filter(|b| b.is_measurable(MIN_MEASURABLE_PX))?;
                Some((*id, bbox.center()))
            })
            .collect();
        self.directory.bind_geo_fallbacks(&self.tuning.catalog, &self.view_box, &centers);

        actions
    }

    // --- Pointer ---

    /// Queue a pointer sample for the next frame.
    pub fn on_pointer_move(&mut self, sample: PointerSample) {
        if self.options.enable_interactions {
            self.hover.queue_sample(sample);
        }
    }

    /// The pointer left the scene: reset right away and let the drift settle.
    pub fn on_pointer_leave(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.options.enable_interactions {
            self.hover.reset_timer().cancel();
            self.parallax.stop();
            if self.hover.active().is_some() {
                self.reset(now_ms, &mut actions);
            } else if !self.viewport.is_animating() && self.viewport.current() != self.base {
                // Idle drift left the layer off its base frame.
                self.viewport.animate_to(self.base, self.tuning.dur_out_ms, Ease::Power1InOut, now_ms, Completion::ResetDone);
            }
        }
        actions
    }

    // --- Focus ---

    /// Keyboard focus entered a region: zoom to it around the default anchor.
    pub fn on_focus<H: SceneHost>(&mut self, host: &H, region: RegionId, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.options.enable_interactions {
            self.hover.reset_timer().cancel();
            self.zoom_to_region(host, region, None, now_ms, &mut actions);
        }
        actions
    }

    pub fn on_blur(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.options.enable_interactions {
            self.schedule_reset(now_ms, &mut actions);
        }
        actions
    }

    // --- External triggers ---

    /// Pointer or focus entered an external trigger carrying `classes`.
    ///
    /// Triggers live outside the scene, so they work even when pointer
    /// interactions are off.
    pub fn on_external_enter<H: SceneHost>(&mut self, host: &H, classes: &[&str], now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.options.external_hover_selector.is_none() {
            return actions;
        }
        let Some(region) = self.region_for_classes(classes) else {
            log::debug!("hover: external trigger {classes:?} names no region");
            return actions;
        };
        self.hover.reset_timer().cancel();
        self.zoom_to_region(host, region, None, now_ms, &mut actions);
        actions
    }

    /// Pointer or focus left an external trigger for somewhere that is
    /// neither the same trigger nor the scene.
    pub fn on_external_leave(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.options.external_hover_selector.is_some() && self.options.external_hover_reset {
            self.hover.reset_timer().cancel();
            self.reset(now_ms, &mut actions);
        }
        actions
    }

    /// Region bound to the first class token that names a destination.
    #[must_use]
    pub fn region_for_classes(&self, classes: &[&str]) -> Option<RegionId> {
        classes
            .iter()
            .filter_map(|c| self.tuning.catalog.match_token(c))
            .find_map(|dest| self.directory.region_for_key(&dest.key))
    }

    // --- Navigation ---

    pub fn on_click<H: SceneHost>(&mut self, host: &H, target: Target) -> Vec<Action> {
        if !self.options.enable_map_navigation {
            return Vec::new();
        }
        self.destination_for(host, target).map(Action::Navigate).into_iter().collect()
    }

    /// Enter/Space on a label or region. Default handling is suppressed even
    /// when nothing matches.
    pub fn on_key_down<H: SceneHost>(&mut self, host: &H, key: &Key, target: Option<Target>) -> Vec<Action> {
        if !self.options.enable_map_navigation || !key.is_activation() {
            return Vec::new();
        }
        let Some(target) = target else {
            return Vec::new();
        };
        let mut actions = vec![Action::SuppressDefault];
        actions.extend(self.destination_for(host, target).map(Action::Navigate));
        actions
    }

    /// Navigation path for a label, or for a region via its nearest label.
    fn destination_for<H: SceneHost>(&self, host: &H, target: Target) -> Option<String> {
        let labels = host.labels();
        let label_id = match target {
            Target::Label(id) => id,
            Target::Region(id) => nearest_label(host.region_client_rect(id), &labels, host.mount_client_rect())?,
        };
        let label = find_label(&labels, label_id)?;
        self.tuning.catalog.match_label(&label.text).map(|d| d.path.clone())
    }

    // --- Resize ---

    /// Recompute the idle frame. Idle layers jump to it; an active region is
    /// re-targeted with a short ease-out so the zoom does not jump.
    pub fn on_resize<H: SceneHost>(&mut self, host: &H, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(vb) = host.view_box() {
            self.view_box = vb;
        }
        self.base = base_frame(self.bounds.as_ref(), &self.view_box, &BaseFrameParams::new(&self.tuning, &self.options));

        match self.hover.active() {
            None => {
                self.viewport.set_immediately(self.base);
                self.hover.finish_reset();
                actions.push(Action::SetTransform(self.base));
            }
            Some(id) => {
                if let Some(target) = self.target_for(host, id, None) {
                    actions.push(Action::HideUnderline);
                    self.viewport.animate_to(target, self.tuning.dur_resize_ms, Ease::Power2Out, now_ms, Completion::ZoomedIn(id));
                }
            }
        }
        actions
    }

    // --- Frame ---

    /// Advance one animation frame.
    pub fn tick<H: SceneHost>(&mut self, host: &H, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        // The host has applied everything emitted so far.
        let applied = self.viewport.current();

        if self.hover.reset_timer().take_due(now_ms) {
            self.reset(now_ms, &mut actions);
        }

        if let Some(sample) = self.hover.take_pending() {
            self.evaluate_pointer(host, sample, now_ms, &mut actions);
        }

        if let Some(step) = self.viewport.step(now_ms) {
            actions.push(Action::SetTransform(step.transform));
            match step.completed {
                Some(Completion::ZoomedIn(id)) => {
                    self.hover.settle(id);
                    if self.hover.phase() == Phase::Settled(id) {
                        self.align_underline(host, id, applied, &mut actions);
                    }
                }
                Some(Completion::ResetDone) => self.hover.finish_reset(),
                None => {}
            }
        }

        let parallax_enabled = self.hover.active().is_none() && !self.viewport.is_animating();
        if let Some(offset) = self.parallax.step(now_ms, parallax_enabled, &self.tuning) {
            let pan = Point::new(self.base.x + offset.x, self.base.y + offset.y);
            let pan = match &self.bounds {
                Some(b) => clamp_pan(pan, self.base.scale, self.tuning.base_pad, &self.view_box, b),
                None => pan,
            };
            let transform = self.base.with_pan(pan);
            self.viewport.set_immediately(transform);
            actions.push(Action::SetTransform(transform));
        }

        actions
    }

    fn evaluate_pointer<H: SceneHost>(&mut self, host: &H, sample: PointerSample, now_ms: f64, actions: &mut Vec<Action>) {
        self.parallax.observe_pointer(sample.client, now_ms, self.tuning.parallax_wake_px);

        let anchor = try_screen_to_scene(host.screen_ctm(), sample.client);
        let hit = host.region_at(sample.client);
        let tweening = self.viewport.is_animating();

        let decision = self
            .hover
            .decide(hit, sample.client, now_ms, tweening, &self.tuning, |id| self.is_forgiven(host, id, anchor));

        match decision {
            Decision::Hold => {}
            Decision::Enter(id) => {
                self.hover.reset_timer().cancel();
                self.zoom_to_region(host, id, anchor, now_ms, actions);
            }
            Decision::Forgive => {
                log::debug!("hover: pointer forgiven near region {:?}", self.hover.active());
                self.hover.reset_timer().cancel();
            }
            Decision::Leave => {
                if self.hover.active().is_none() && !tweening && !self.parallax.is_asleep() {
                    if let Some(anchor) = anchor {
                        self.parallax.aim(anchor, &self.view_box, &self.tuning);
                    }
                }
                self.schedule_reset(now_ms, actions);
            }
        }
    }

    /// Whether `anchor` lies inside the region's bbox grown by its
    /// forgiveness insets. Unknown anchor or bbox means no.
    fn is_forgiven<H: SceneHost>(&self, host: &H, id: RegionId, anchor: Option<Point>) -> bool {
        let (Some(anchor), Some(info)) = (anchor, self.directory.get(id)) else {
            return false;
        };
        let Some(bbox) = host.region_bbox(id) else {
            return false;
        };
        let insets = self.tuning.region_rules.forgive_insets(info, self.tuning.forgive_px);
        bbox.contains_expanded(anchor, insets)
    }

    // --- Transitions ---

    fn zoom_to_region<H: SceneHost>(&mut self, host: &H, id: RegionId, anchor: Option<Point>, now_ms: f64, actions: &mut Vec<Action>) {
        if self.hover.active() == Some(id) || self.directory.get(id).is_none() {
            return;
        }
        self.parallax.stop();
        let previous = self.hover.activate(id, now_ms);
        log::debug!("hover: region {previous:?} -> {id:?}");
        if let Some(prev) = previous {
            actions.push(Action::SetRegionActive { region: prev, active: false });
        }
        actions.push(Action::SetRegionActive { region: id, active: true });
        actions.push(Action::HideUnderline);

        let Some(target) = self.target_for(host, id, anchor) else {
            log::debug!("hover: region {id:?} has no measurable bbox");
            return;
        };
        self.viewport.animate_to(target, self.tuning.dur_in_ms, Ease::Power1InOut, now_ms, Completion::ZoomedIn(id));
    }

    fn reset(&mut self, now_ms: f64, actions: &mut Vec<Action>) {
        let Some(previous) = self.hover.clear() else {
            return;
        };
        log::debug!("hover: reset from region {previous:?}");
        actions.push(Action::SetRegionActive { region: previous, active: false });
        actions.push(Action::HideUnderline);
        self.parallax.stop();
        self.viewport.animate_to(self.base, self.tuning.dur_out_ms, Ease::Power1InOut, now_ms, Completion::ResetDone);
    }

    fn schedule_reset(&mut self, now_ms: f64, actions: &mut Vec<Action>) {
        if self.hover.reset_timer().schedule(now_ms, self.tuning.reset_delay_ms) {
            self.reset(now_ms, actions);
        }
    }

    fn target_for<H: SceneHost>(&self, host: &H, id: RegionId, anchor: Option<Point>) -> Option<Transform> {
        let info = self.directory.get(id)?;
        let params = TargetParams {
            scale: self.base.scale * self.tuning.hover_scale,
            pad: self.tuning.hover_pad,
            bias: Point::new(
                self.tuning.region_rules.hover_bias_x(info, self.tuning.hover_bias_x),
                self.tuning.hover_bias_y,
            ),
            anchor_factor: Point::new(self.options.hover_anchor_x_factor, self.options.hover_anchor_y_factor),
        };
        region_target(host.region_bbox(id), anchor, &self.view_box, self.bounds.as_ref(), &params)
    }

    /// Underline the label nearest `id`. `applied` is the layer transform the
    /// host had in place when the label rects were measured.
    fn align_underline<H: SceneHost>(&self, host: &H, id: RegionId, applied: Transform, actions: &mut Vec<Action>) {
        let labels = host.labels();
        let label = nearest_label(host.region_client_rect(id), &labels, host.mount_client_rect()).and_then(|l| find_label(&labels, l));
        let Some((label, rect)) = label.and_then(|l| l.client_rect.map(|r| (l, r))) else {
            actions.push(Action::HideUnderline);
            return;
        };
        let client_to_layer = host.screen_ctm().map(|ctm| ctm.multiply(&applied.to_affine()));
        actions.push(Action::ShowUnderline(underline_for(&rect, &label.text, client_to_layer, &self.tuning)));
    }

    // --- Lifecycle ---

    /// Cancel any pending reset and kill the tween. The layer stays where it is.
    pub fn teardown(&mut self) {
        self.hover.reset_timer().cancel();
        self.viewport.kill();
        self.parallax.stop();
    }

    // --- Queries ---

    #[must_use]
    pub fn active_region(&self) -> Option<RegionId> {
        self.hover.active()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.hover.phase()
    }

    /// The transform last handed to the host.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.viewport.current()
    }

    /// The current idle frame.
    #[must_use]
    pub fn base(&self) -> Transform {
        self.base
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    #[must_use]
    pub fn reset_pending(&self) -> bool {
        self.hover.reset_pending()
    }

    #[must_use]
    pub fn directory(&self) -> &RegionDirectory {
        &self.directory
    }

    #[must_use]
    pub fn options(&self) -> &HoverZoomOptions {
        &self.options
    }
}

fn find_label(labels: &[Label], id: LabelId) -> Option<&Label> {
    labels.iter().find(|l| l.id == id)
}
