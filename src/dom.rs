//! Browser binding.
//!
//! [`DomScene`] answers the engine's geometry queries from the live SVG.
//! [`Engine`] owns an [`EngineCore`] plus the scene and applies the actions
//! the core returns. [`HoverZoom`] wires an engine to page events. Each
//! [`MapInstance`] runs one animation frame loop that steps the engine and
//! the decorative waves. [`init_map`] and [`init_map_in`] tie loading,
//! layer setup and both together.
//!
//! Nothing here panics: JS exceptions are rendered with
//! [`js_error`] and logged, and a failed step skips only itself.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, DomRect, Element, Event, EventTarget, FocusEvent, KeyboardEvent, MouseEvent, Node, SvgGraphicsElement,
    SvgMatrix, SvgRect, SvgsvgElement, Window,
};

use crate::catalog::Catalog;
use crate::config::{HoverZoomOptions, MapOptions};
use crate::engine::{Action, EngineCore, Underline};
use crate::error::{InitError, js_error};
use crate::geom::{Affine, Point, Rect, ViewBox};
use crate::host::{Label, LabelId, SceneHost};
use crate::input::{Key, PointerSample, Target};
use crate::loader::load_inline_svg;
use crate::region::{RegionDirectory, RegionId, RegionInfo};
use crate::transform::Transform;
use crate::waves::{WaveFrame, Waves};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const ZOOM_LAYER_ID: &str = "zoom-layer";
const REGION_MARKER_SELECTOR: &str = "[data-region]";
const REGION_MARKER_ATTR: &str = "data-region";
const REGION_CLASS: &str = "region";
const REGION_SELECTOR: &str = ".region";
const ACTIVE_CLASS: &str = "is-active";
const REGION_INDEX_ATTR: &str = "data-region-index";
const LABEL_INDEX_ATTR: &str = "data-label-index";
const LABEL_SELECTOR: &str = "#labels-region .label--region, .labels--region .label--region, text.label--region";
const UNDERLINE_CLASS: &str = "label-underline-dots";
const WAVES_ROOT_SELECTOR: &str = "#waves";
const WAVE_SELECTOR: &str = ".wave";
const WAVE_CLONE_CLASS: &str = "wave-clone";
const WAVE_INIT_ATTR: &str = "data-wave-init";

/// Any of these means hover is not a reliable input.
const NO_HOVER_QUERIES: [&str; 3] = ["(max-width: 991px)", "(pointer: coarse)", "(hover: none)"];

#[wasm_bindgen]
extern "C" {
    /// Any element with `getBBox`.
    type BBoxTarget;

    /// `getBBox`, with the exception it throws for unrendered elements
    /// surfaced as an `Err`.
    #[wasm_bindgen(method, catch, js_name = getBBox)]
    fn try_bbox(this: &BBoxTarget) -> Result<SvgRect, JsValue>;
}

// =============================================================
// Scene
// =============================================================

/// The mounted SVG as seen by the engine.
pub struct DomScene {
    document: Document,
    svg: SvgsvgElement,
    layer: SvgGraphicsElement,
    mount: Element,
    regions: Vec<SvgGraphicsElement>,
    labels: Vec<Element>,
}

impl DomScene {
    /// Index the regions and labels under `svg`.
    ///
    /// Every `[data-region]` element is given the region class first, then
    /// all region-class elements in document order form the directory. Each
    /// region and label is stamped with its index so event targets can be
    /// resolved back to ids.
    fn discover(document: Document, svg: SvgsvgElement, layer: SvgGraphicsElement, mount: Element, catalog: &Catalog) -> (Self, RegionDirectory) {
        for marked in select_all::<Element>(&svg, REGION_MARKER_SELECTOR) {
            if let Err(e) = marked.class_list().add_1(REGION_CLASS) {
                log::warn!("could not mark region: {}", js_error(&e));
            }
        }

        let mut regions = Vec::new();
        let mut infos = Vec::new();
        for region in select_all::<SvgGraphicsElement>(&svg, REGION_SELECTOR) {
            set_attr(&region, REGION_INDEX_ATTR, &regions.len().to_string());
            let code = region.get_attribute(REGION_MARKER_ATTR);
            let classes = class_tokens(&region);
            let classes: Vec<&str> = classes.iter().map(String::as_str).collect();
            infos.push(RegionInfo::new(code.as_deref(), &classes));
            regions.push(region);
        }

        let mut labels = select_all::<Element>(&svg, LABEL_SELECTOR);
        if labels.is_empty() {
            labels = select_all::<Element>(&svg, "text")
                .into_iter()
                .filter(|t| catalog.names_any(&t.text_content().unwrap_or_default()))
                .collect();
        }
        for (i, label) in labels.iter().enumerate() {
            set_attr(label, LABEL_INDEX_ATTR, &i.to_string());
        }
        log::debug!("scene: {} regions, {} labels", regions.len(), labels.len());

        let scene = Self { document, svg, layer, mount, regions, labels };
        (scene, RegionDirectory::new(infos))
    }

    /// What a click or key press landed on. Labels win over regions.
    fn resolve_target(&self, event: &Event) -> Option<Target> {
        let el = event_element(event.target().as_ref())?;
        let node: &Node = &el;
        if !self.svg.contains(Some(node)) {
            return None;
        }
        if let Some(i) = closest(&el, &attr_selector(LABEL_INDEX_ATTR)).and_then(|l| index_attr(&l, LABEL_INDEX_ATTR)) {
            return Some(Target::Label(LabelId(i)));
        }
        let region = closest(&el, &attr_selector(REGION_INDEX_ATTR))?;
        index_attr(&region, REGION_INDEX_ATTR).map(|i| Target::Region(RegionId(i)))
    }
}

impl SceneHost for DomScene {
    fn view_box(&self) -> Option<ViewBox> {
        let r = self.svg.view_box().base_val()?;
        ViewBox::new(f64::from(r.x()), f64::from(r.y()), f64::from(r.width()), f64::from(r.height()))
    }

    fn scene_bounds(&self) -> Option<Rect> {
        bbox(&self.layer)
    }

    fn region_bbox(&self, id: RegionId) -> Option<Rect> {
        bbox(self.regions.get(id.0)?)
    }

    fn region_client_rect(&self, id: RegionId) -> Option<Rect> {
        self.regions.get(id.0).map(|r| client_rect(r))
    }

    fn mount_client_rect(&self) -> Option<Rect> {
        Some(client_rect(&self.mount))
    }

    fn labels(&self) -> Vec<Label> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, el)| Label {
                id: LabelId(i),
                text: el.text_content().unwrap_or_default(),
                client_rect: Some(client_rect(el)),
            })
            .collect()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn region_at(&self, client: Point) -> Option<RegionId> {
        let hit = self.document.element_from_point(client.x as f32, client.y as f32)?;
        let node: &Node = &hit;
        if !self.svg.contains(Some(node)) {
            return None;
        }
        let region = closest(&hit, REGION_SELECTOR)?;
        index_attr(&region, REGION_INDEX_ATTR)
            .filter(|i| *i < self.regions.len())
            .map(RegionId)
    }

    fn screen_ctm(&self) -> Option<Affine> {
        self.svg.get_screen_ctm().map(|m| affine(&m))
    }
}

// =============================================================
// Engine
// =============================================================

/// An engine core bound to a live scene.
pub struct Engine {
    core: EngineCore,
    scene: DomScene,
    underline: Option<Element>,
    resize_pending: bool,
}

impl Engine {
    fn new(core: EngineCore, scene: DomScene) -> Self {
        Self { core, scene, underline: None, resize_pending: false }
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    /// Run a core handler and apply what it returns. `event` is cancelled
    /// when the handler asks for it.
    fn dispatch(&mut self, event: Option<&Event>, handler: impl FnOnce(&mut EngineCore, &DomScene) -> Vec<Action>) {
        let actions = handler(&mut self.core, &self.scene);
        if let Some(event) = event {
            if actions.contains(&Action::SuppressDefault) {
                event.prevent_default();
            }
        }
        self.apply(&actions);
    }

    fn frame(&mut self, now_ms: f64) {
        if std::mem::take(&mut self.resize_pending) {
            self.dispatch(None, |core, scene| core.on_resize(scene, now_ms));
        }
        self.dispatch(None, |core, scene| core.tick(scene, now_ms));
    }

    fn apply(&mut self, actions: &[Action]) {
        for action in actions {
            if let Err(e) = self.apply_one(action) {
                log::warn!("could not apply {action:?}: {}", js_error(&e));
            }
        }
    }

    fn apply_one(&mut self, action: &Action) -> Result<(), JsValue> {
        match action {
            Action::SetTransform(t) => self.scene.layer.set_attribute("transform", &transform_attr(t)),
            Action::SetRegionActive { region, active } => match self.scene.regions.get(region.0) {
                Some(el) => el.class_list().toggle_with_force(ACTIVE_CLASS, *active).map(|_| ()),
                None => Ok(()),
            },
            Action::ShowUnderline(u) => self.show_underline(u),
            Action::HideUnderline => match &self.underline {
                Some(line) => line.set_attribute("opacity", "0"),
                None => Ok(()),
            },
            Action::SetRegionAriaLabel { region, label } => match self.scene.regions.get(region.0) {
                Some(el) => el.set_attribute("aria-label", label),
                None => Ok(()),
            },
            Action::Navigate(path) => {
                let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
                window.location().assign(path)
            }
            Action::SuppressDefault => Ok(()),
        }
    }

    fn show_underline(&mut self, u: &Underline) -> Result<(), JsValue> {
        let line = match &self.underline {
            Some(line) => line.clone(),
            None => {
                let line = self.scene.document.create_element_ns(Some(SVG_NS), "line")?;
                line.set_attribute("class", UNDERLINE_CLASS)?;
                line.set_attribute("pointer-events", "none")?;
                self.scene.layer.append_child(&line)?;
                self.underline = Some(line.clone());
                line
            }
        };
        line.set_attribute("x1", &u.from.x.to_string())?;
        line.set_attribute("y1", &u.from.y.to_string())?;
        line.set_attribute("x2", &u.to.x.to_string())?;
        line.set_attribute("y2", &u.to.y.to_string())?;
        line.set_attribute("opacity", "1")
    }

    fn teardown(&mut self) {
        self.core.teardown();
        if let Err(e) = self.apply_one(&Action::HideUnderline) {
            log::warn!("could not hide underline: {}", js_error(&e));
        }
    }
}

type SharedEngine = Rc<RefCell<Engine>>;

/// Run `f` on the engine unless a handler further up the stack holds it.
fn with_engine(engine: &SharedEngine, f: impl FnOnce(&mut Engine)) {
    match engine.try_borrow_mut() {
        Ok(mut engine) => f(&mut engine),
        Err(_) => log::debug!("engine busy, event dropped"),
    }
}

// =============================================================
// Event wiring
// =============================================================

/// A registered DOM listener, removed on teardown.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, capture: bool, handler: impl FnMut(Event) + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback_and_bool(kind, callback.as_ref().unchecked_ref(), capture)?;
        Ok(Self { target: target.clone(), kind, capture, callback })
    }

    fn detach(&self) {
        if let Err(e) =
            self.target
                .remove_event_listener_with_callback_and_bool(self.kind, self.callback.as_ref().unchecked_ref(), self.capture)
        {
            log::warn!("could not remove {} listener: {}", self.kind, js_error(&e));
        }
    }
}

/// The per-frame callback, rescheduling itself until stopped or dropped.
struct FrameLoop {
    window: Window,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    request: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(window: &Window, mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let request = Rc::new(Cell::new(None));

        let callback_for_frame = Rc::clone(&callback);
        let request_for_frame = Rc::clone(&request);
        let window_for_frame = window.clone();
        let cb = Closure::wrap(Box::new(move |ts: f64| {
            request_for_frame.set(None);
            on_frame(ts);
            if let Some(cb) = callback_for_frame.borrow().as_ref() {
                match window_for_frame.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => request_for_frame.set(Some(id)),
                    Err(e) => log::warn!("frame loop stopped: {}", js_error(&e)),
                }
            }
        }) as Box<dyn FnMut(f64)>);

        request.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
        *callback.borrow_mut() = Some(cb);
        Ok(Self { window: window.clone(), callback, request })
    }

    fn stop(&self) {
        if let Some(id) = self.request.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("could not cancel frame: {}", js_error(&e));
            }
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A running hover-zoom engine and its page listeners. Frames reach it
/// through the map's frame loop.
pub struct HoverZoom {
    engine: SharedEngine,
    listeners: Vec<Listener>,
}

impl HoverZoom {
    fn start(window: &Window, scene: DomScene, directory: RegionDirectory, options: &MapOptions) -> Result<Self, InitError> {
        let mut core = EngineCore::new(&scene, directory, options)?;
        let setup = core.setup(&scene);
        let hover_options = core.options().clone();
        let regions = scene.regions.clone();
        let svg = scene.svg.clone();
        let mount = scene.mount.clone();
        let document = scene.document.clone();

        let mut engine = Engine::new(core, scene);
        engine.apply(&setup);
        let engine = Rc::new(RefCell::new(engine));

        let mut listeners = Vec::new();
        let wired = wire_scene(&engine, &svg, &regions, &hover_options, &mut listeners)
            .and_then(|()| wire_window(&engine, window, &mut listeners))
            .and_then(|()| wire_external(&engine, &document, &mount, &hover_options, &mut listeners));

        match wired {
            Ok(()) => Ok(Self { engine, listeners }),
            Err(e) => {
                for listener in &listeners {
                    listener.detach();
                }
                Err(InitError::Binding(js_error(&e)))
            }
        }
    }

    /// The currently active region, if any.
    #[must_use]
    pub fn active_region(&self) -> Option<RegionId> {
        let Ok(engine) = self.engine.try_borrow() else {
            return None;
        };
        engine.core().active_region()
    }

    /// The transform last written to the layer.
    #[must_use]
    pub fn transform(&self) -> Option<Transform> {
        let Ok(engine) = self.engine.try_borrow() else {
            return None;
        };
        Some(engine.core().transform())
    }

    /// Remove every listener and drop pending work. Safe to call more than
    /// once.
    pub fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        with_engine(&self.engine, Engine::teardown);
    }
}

impl Drop for HoverZoom {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn wire_scene(
    engine: &SharedEngine,
    svg: &SvgsvgElement,
    regions: &[SvgGraphicsElement],
    options: &HoverZoomOptions,
    out: &mut Vec<Listener>,
) -> Result<(), JsValue> {
    if options.enable_interactions {
        let e = Rc::clone(engine);
        out.push(Listener::attach(svg, "pointermove", false, move |event: Event| {
            let Some(pointer) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let sample = PointerSample::new(f64::from(pointer.client_x()), f64::from(pointer.client_y()));
            with_engine(&e, |engine| engine.core.on_pointer_move(sample));
        })?);

        let e = Rc::clone(engine);
        out.push(Listener::attach(svg, "pointerleave", false, move |_event: Event| {
            let now = now_ms();
            with_engine(&e, |engine| engine.dispatch(None, |core, _| core.on_pointer_leave(now)));
        })?);

        for (i, region) in regions.iter().enumerate() {
            if !region.has_attribute("tabindex") {
                set_attr(region, "tabindex", "0");
            }
            set_attr(region, "role", "link");

            let e = Rc::clone(engine);
            out.push(Listener::attach(region, "focus", false, move |_event: Event| {
                let now = now_ms();
                with_engine(&e, |engine| engine.dispatch(None, |core, scene| core.on_focus(scene, RegionId(i), now)));
            })?);

            let e = Rc::clone(engine);
            out.push(Listener::attach(region, "blur", false, move |_event: Event| {
                let now = now_ms();
                with_engine(&e, |engine| engine.dispatch(None, |core, _| core.on_blur(now)));
            })?);
        }
    }

    let e = Rc::clone(engine);
    out.push(Listener::attach(svg, "click", false, move |event: Event| {
        with_engine(&e, |engine| {
            let Some(target) = engine.scene.resolve_target(&event) else {
                return;
            };
            engine.dispatch(Some(&event), |core, scene| core.on_click(scene, target));
        });
    })?);

    let e = Rc::clone(engine);
    out.push(Listener::attach(svg, "keydown", false, move |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| Key(k.key())) else {
            return;
        };
        with_engine(&e, |engine| {
            let target = engine.scene.resolve_target(&event);
            engine.dispatch(Some(&event), |core, scene| core.on_key_down(scene, &key, target));
        });
    })?);

    Ok(())
}

fn wire_window(engine: &SharedEngine, window: &Window, out: &mut Vec<Listener>) -> Result<(), JsValue> {
    let e = Rc::clone(engine);
    out.push(Listener::attach(window, "resize", false, move |_event: Event| {
        with_engine(&e, |engine| engine.resize_pending = true);
    })?);
    Ok(())
}

/// Hover and focus on elements outside the scene (nav links, cards) that
/// name a region through their class list.
fn wire_external(
    engine: &SharedEngine,
    document: &Document,
    mount: &Element,
    options: &HoverZoomOptions,
    out: &mut Vec<Listener>,
) -> Result<(), JsValue> {
    let Some(selector) = options.external_hover_selector.clone() else {
        return Ok(());
    };
    if let Err(e) = document.query_selector(&selector) {
        log::warn!("external hover selector {selector:?} is invalid: {}", js_error(&e));
        return Ok(());
    }

    for kind in ["pointerover", "focusin"] {
        let e = Rc::clone(engine);
        let selector = selector.clone();
        out.push(Listener::attach(document, kind, true, move |event: Event| {
            let Some(trigger) = event_element(event.target().as_ref()).and_then(|el| closest(&el, &selector)) else {
                return;
            };
            let classes = class_tokens(&trigger);
            let classes: Vec<&str> = classes.iter().map(String::as_str).collect();
            let now = now_ms();
            with_engine(&e, |engine| engine.dispatch(None, |core, scene| core.on_external_enter(scene, &classes, now)));
        })?);
    }

    let e = Rc::clone(engine);
    let pointer_selector = selector.clone();
    let mount = mount.clone();
    out.push(Listener::attach(document, "pointerout", true, move |event: Event| {
        let Some(from) = event_element(event.target().as_ref()).and_then(|el| closest(&el, &pointer_selector)) else {
            return;
        };
        let related = event.dyn_ref::<MouseEvent>().and_then(MouseEvent::related_target);
        if stays_with(&from, related.as_ref(), &pointer_selector, Some(&mount)) {
            return;
        }
        let now = now_ms();
        with_engine(&e, |engine| engine.dispatch(None, |core, _| core.on_external_leave(now)));
    })?);

    let e = Rc::clone(engine);
    out.push(Listener::attach(document, "focusout", true, move |event: Event| {
        let Some(from) = event_element(event.target().as_ref()).and_then(|el| closest(&el, &selector)) else {
            return;
        };
        let related = event.dyn_ref::<FocusEvent>().and_then(FocusEvent::related_target);
        if stays_with(&from, related.as_ref(), &selector, None) {
            return;
        }
        let now = now_ms();
        with_engine(&e, |engine| engine.dispatch(None, |core, _| core.on_external_leave(now)));
    })?);

    Ok(())
}

/// Whether leaving `from` for `related` keeps the trigger engaged: the new
/// target is inside the same trigger, or inside the map itself.
fn stays_with(from: &Element, related: Option<&EventTarget>, selector: &str, mount: Option<&Element>) -> bool {
    let Some(node) = related.and_then(|t| t.dyn_ref::<Node>()) else {
        return false;
    };
    let from: &Node = from;
    let same_trigger = node
        .dyn_ref::<Element>()
        .and_then(|el| closest(el, selector))
        .is_some_and(|trigger| trigger.is_same_node(Some(from)));
    same_trigger || mount.is_some_and(|m| m.contains(Some(node)))
}

// =============================================================
// Waves
// =============================================================

/// Wave tiles under `#waves`, each paired with a clone, and the drift
/// state that moves them.
struct WaveField {
    pairs: Vec<Option<(SvgGraphicsElement, SvgGraphicsElement)>>,
    waves: Waves,
}

impl WaveField {
    /// Pair up every wave not already set up by an earlier init. `None` if
    /// the scene has no waves.
    fn discover(svg: &SvgsvgElement, now_ms: f64) -> Option<Self> {
        let root = svg.query_selector(WAVES_ROOT_SELECTOR).unwrap_or_default()?;
        let tiles = select_all::<SvgGraphicsElement>(&root, WAVE_SELECTOR);
        let widths: Vec<Option<f64>> = tiles
            .iter()
            .map(|tile| match tile.get_attribute(WAVE_INIT_ATTR) {
                Some(_) => None,
                None => bbox(tile).map(|r| r.width),
            })
            .collect();
        let waves = Waves::new(&widths, now_ms);
        if waves.is_empty() {
            return None;
        }

        let pairs = tiles
            .iter()
            .zip(&widths)
            .map(|(tile, width)| {
                if width.is_none() {
                    return None;
                }
                match pair_tile(tile) {
                    Ok(clone) => Some((tile.clone(), clone)),
                    Err(e) => {
                        log::warn!("could not clone wave: {}", js_error(&e));
                        None
                    }
                }
            })
            .collect();
        log::debug!("waves: {} tiles", tiles.len());

        let field = Self { pairs, waves };
        field.place(&field.waves.initial_frames());
        Some(field)
    }

    fn frame(&mut self, now_ms: f64) {
        let frames = self.waves.tick(now_ms);
        self.place(&frames);
    }

    fn place(&self, frames: &[(usize, WaveFrame)]) {
        for (slot, f) in frames {
            let Some(Some((a, b))) = self.pairs.get(*slot) else {
                continue;
            };
            place_tile(a, f.a_x, 0.0, f.a_opacity);
            place_tile(b, f.b_x, f.b_y, f.b_opacity);
        }
    }
}

/// Mark `tile` as set up and insert its clone right after it.
fn pair_tile(tile: &SvgGraphicsElement) -> Result<SvgGraphicsElement, JsValue> {
    tile.set_attribute(WAVE_INIT_ATTR, "1")?;
    let clone = tile
        .clone_node_with_deep(true)?
        .dyn_into::<SvgGraphicsElement>()
        .map_err(|_| JsValue::from_str("wave clone is not a graphics element"))?;
    clone.class_list().add_1(WAVE_CLONE_CLASS)?;
    let parent = tile.parent_node().ok_or_else(|| JsValue::from_str("wave has no parent"))?;
    parent.insert_before(&clone, tile.next_sibling().as_ref())?;

    for el in [tile, &clone] {
        let style = el.style();
        style.set_property("transform-box", "fill-box")?;
        style.set_property("transform-origin", "50% 50%")?;
    }
    Ok(clone)
}

fn place_tile(tile: &SvgGraphicsElement, x: f64, y: f64, opacity: f64) {
    let style = tile.style();
    let placed = style
        .set_property("transform", &format!("translate({x}px, {y}px)"))
        .and_then(|()| style.set_property("opacity", &opacity.to_string()));
    if let Err(e) = placed {
        log::debug!("could not place wave: {}", js_error(&e));
    }
}

// =============================================================
// Init
// =============================================================

/// A map mounted on the page.
#[wasm_bindgen]
pub struct MapInstance {
    svg: SvgsvgElement,
    hover: Option<HoverZoom>,
    frames: Option<FrameLoop>,
}

#[wasm_bindgen]
impl MapInstance {
    /// The inline scene root.
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn svg(&self) -> SvgsvgElement {
        self.svg.clone()
    }

    /// Whether the hover-zoom engine is running.
    #[wasm_bindgen(getter, js_name = hasHover)]
    #[must_use]
    pub fn has_hover(&self) -> bool {
        self.hover.is_some()
    }

    /// Stop the frame loop and the hover engine. The map itself stays on
    /// the page, waves frozen where they are.
    pub fn teardown(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.stop();
        }
        if let Some(hover) = self.hover.as_mut() {
            hover.teardown();
        }
    }
}

impl MapInstance {
    /// The hover-zoom engine, or `None` if it was disabled or degraded.
    #[must_use]
    pub fn hover(&self) -> Option<&HoverZoom> {
        self.hover.as_ref()
    }
}

/// Load the scene into the element matched by `options.mount`.
///
/// Failures are logged and yield `None`.
pub async fn init_map(options: MapOptions) -> Option<MapInstance> {
    install_logging();
    match init_from_selector(options).await {
        Ok(map) => Some(map),
        Err(e) => {
            log::error!("map init failed: {e}");
            None
        }
    }
}

/// JS entry point. Takes a plain options object, whose `mount` may be a
/// selector or an element, and rejects with the init error message.
///
/// # Errors
///
/// Rejects if the options are invalid or the map cannot be loaded.
#[wasm_bindgen(js_name = initMap)]
pub async fn init_map_js(options: JsValue) -> Result<MapInstance, JsValue> {
    install_logging();
    let result = match (MapOptions::from_js(&options), mount_element(&options)) {
        (Ok(parsed), Some(mount)) => init_map_in(&mount, parsed).await,
        (Ok(parsed), None) => init_from_selector(parsed).await,
        (Err(e), _) => Err(e),
    };
    result.map_err(|e| {
        log::error!("map init failed: {e}");
        JsValue::from_str(&e.to_string())
    })
}

/// `options.mount` when it is an element rather than a selector.
fn mount_element(options: &JsValue) -> Option<Element> {
    if !options.is_object() {
        return None;
    }
    let Ok(mount) = js_sys::Reflect::get(options, &JsValue::from_str("mount")) else {
        return None;
    };
    mount.dyn_ref::<Element>().cloned()
}

async fn init_from_selector(options: MapOptions) -> Result<MapInstance, InitError> {
    let options = options.normalized();
    let (selector, _) = options.require_source()?;
    let document = web_sys::window().and_then(|w| w.document()).ok_or(InitError::NoWindow)?;
    let mount = document
        .query_selector(selector)
        .map_err(|e| InitError::MountNotFound(format!("{selector}: {}", js_error(&e))))?
        .ok_or_else(|| InitError::MountNotFound(selector.to_owned()))?;
    init_map_in(&mount, options).await
}

/// Load the scene into `mount`.
///
/// A hover engine that cannot start is logged and left off; the map is
/// still returned.
///
/// # Errors
///
/// Any load failure, or [`InitError::NoWindow`] outside a browser.
pub async fn init_map_in(mount: &Element, options: MapOptions) -> Result<MapInstance, InitError> {
    install_logging();
    let mut options = options.normalized();
    let url = options.url.clone().ok_or(InitError::MissingUrl)?;
    let window = web_sys::window().ok_or(InitError::NoWindow)?;
    let document = window.document().ok_or(InitError::NoWindow)?;

    let svg = load_inline_svg(mount, &url).await?;
    prepare_root(&svg, &options.class_name);
    let layer = ensure_zoom_layer(&document, &svg).map_err(|e| InitError::Binding(js_error(&e)))?;
    fonts_ready(&document).await;

    let waves = if options.waves { WaveField::discover(&svg, now_ms()) } else { None };

    let mut hover = None;
    if options.region_hover_zoom {
        if hover_unreliable(&window) {
            log::debug!("no reliable hover on this device; pointer interactions off");
            options.region_hover_options.enable_interactions = false;
        }
        let (scene, directory) = DomScene::discover(document, svg.clone(), layer, mount.clone(), &options.tuning.catalog);
        match HoverZoom::start(&window, scene, directory, &options) {
            Ok(started) => hover = Some(started),
            Err(e) => log::warn!("hover zoom disabled: {e}"),
        }
    }

    let frames = match start_frames(&window, hover.as_ref(), waves) {
        Ok(frames) => frames,
        Err(e) => {
            log::warn!("no frame clock, hover zoom and waves disabled: {}", js_error(&e));
            hover = None;
            None
        }
    };
    Ok(MapInstance { svg, hover, frames })
}

/// One frame loop per map, driving the hover engine and the waves.
fn start_frames(window: &Window, hover: Option<&HoverZoom>, mut waves: Option<WaveField>) -> Result<Option<FrameLoop>, JsValue> {
    if hover.is_none() && waves.is_none() {
        return Ok(None);
    }
    let engine = hover.map(|h| Rc::clone(&h.engine));
    let frames = FrameLoop::start(window, move |now| {
        if let Some(engine) = &engine {
            with_engine(engine, |engine| engine.frame(now));
        }
        if let Some(waves) = waves.as_mut() {
            waves.frame(now);
        }
    })?;
    Ok(Some(frames))
}

fn prepare_root(svg: &SvgsvgElement, class_name: &str) {
    if !class_name.is_empty() {
        if let Err(e) = svg.class_list().add_1(class_name) {
            log::warn!("could not add class {class_name:?}: {}", js_error(&e));
        }
    }
    set_attr(svg, "preserveAspectRatio", "xMidYMid meet");
    infer_view_box(svg);
}

/// Give a root without a `viewBox` one that frames its content.
fn infer_view_box(svg: &SvgsvgElement) {
    if svg.has_attribute("viewBox") {
        return;
    }
    match bbox(svg).and_then(|b| ViewBox::from_bounds(&b)) {
        Some(view_box) => set_attr(svg, "viewBox", &view_box.to_attr()),
        None => log::warn!("could not infer viewBox for scene root"),
    }
}

/// Resolve once web fonts have loaded, so label rects are final.
async fn fonts_ready(document: &Document) {
    let ready = match document.fonts().ready() {
        Ok(ready) => ready,
        Err(e) => {
            log::debug!("font loading status unavailable: {}", js_error(&e));
            return;
        }
    };
    if let Err(e) = JsFuture::from(ready).await {
        log::warn!("web fonts failed to load: {}", js_error(&e));
    }
}

/// The `<g id="zoom-layer">` that carries the transform. If the document
/// has none, one is created and every element child except `<defs>` is
/// moved into it; it is placed right after `<defs>`.
///
/// # Errors
///
/// Any DOM exception while creating or moving nodes.
pub fn ensure_zoom_layer(document: &Document, svg: &SvgsvgElement) -> Result<SvgGraphicsElement, JsValue> {
    if let Some(existing) = svg.query_selector(&format!("#{ZOOM_LAYER_ID}"))? {
        if let Some(layer) = existing.dyn_ref::<SvgGraphicsElement>() {
            return Ok(layer.clone());
        }
    }

    let layer = document.create_element_ns(Some(SVG_NS), "g")?;
    layer.set_id(ZOOM_LAYER_ID);

    let children = svg.child_nodes();
    let elements: Vec<Element> = (0..children.length())
        .filter_map(|i| children.item(i))
        .filter_map(|n| n.dyn_ref::<Element>().cloned())
        .collect();
    let mut defs = None;
    for el in elements {
        if el.local_name() == "defs" {
            if defs.is_none() {
                defs = Some(el);
            }
        } else {
            layer.append_child(&el)?;
        }
    }

    let anchor = match &defs {
        Some(defs) => defs.next_sibling(),
        None => svg.first_child(),
    };
    svg.insert_before(&layer, anchor.as_ref())?;

    layer
        .dyn_into::<SvgGraphicsElement>()
        .map_err(|_| JsValue::from_str("zoom layer is not a graphics element"))
}

fn hover_unreliable(window: &Window) -> bool {
    NO_HOVER_QUERIES.iter().any(|q| match window.match_media(q) {
        Ok(Some(list)) => list.matches(),
        Ok(None) => false,
        Err(e) => {
            log::debug!("media query {q} failed: {}", js_error(&e));
            false
        }
    })
}

fn install_logging() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::warn!("keeping existing logger: {e}");
        }
    });
}

// =============================================================
// Helpers
// =============================================================

fn now_ms() -> f64 {
    web_sys::window().and_then(|w| w.performance()).map_or(0.0, |p| p.now())
}

fn transform_attr(t: &Transform) -> String {
    format!("translate({} {}) scale({})", t.x, t.y, t.scale)
}

fn bbox(el: &SvgGraphicsElement) -> Option<Rect> {
    match el.unchecked_ref::<BBoxTarget>().try_bbox() {
        Ok(r) => Some(Rect::new(f64::from(r.x()), f64::from(r.y()), f64::from(r.width()), f64::from(r.height()))),
        Err(e) => {
            log::debug!("getBBox failed: {}", js_error(&e));
            None
        }
    }
}

fn client_rect(el: &Element) -> Rect {
    let r: DomRect = el.get_bounding_client_rect();
    Rect::new(r.x(), r.y(), r.width(), r.height())
}

fn affine(m: &SvgMatrix) -> Affine {
    Affine {
        a: f64::from(m.a()),
        b: f64::from(m.b()),
        c: f64::from(m.c()),
        d: f64::from(m.d()),
        e: f64::from(m.e()),
        f: f64::from(m.f()),
    }
}

fn select_all<T: JsCast + Clone>(root: &Element, selector: &str) -> Vec<T> {
    match root.query_selector_all(selector) {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_ref::<T>().cloned())
            .collect(),
        Err(e) => {
            log::warn!("bad selector {selector:?}: {}", js_error(&e));
            Vec::new()
        }
    }
}

fn closest(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).unwrap_or_default()
}

fn event_element(target: Option<&EventTarget>) -> Option<Element> {
    target?.dyn_ref::<Element>().cloned()
}

fn class_tokens(el: &Element) -> Vec<String> {
    el.get_attribute("class")
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

fn attr_selector(attr: &str) -> String {
    format!("[{attr}]")
}

fn index_attr(el: &Element, attr: &str) -> Option<usize> {
    let raw = el.get_attribute(attr)?;
    let Ok(index) = raw.parse::<usize>() else {
        return None;
    };
    Some(index)
}

fn set_attr(el: &Element, name: &str, value: &str) {
    if let Err(e) = el.set_attribute(name, value) {
        log::warn!("could not set {name}: {}", js_error(&e));
    }
}
