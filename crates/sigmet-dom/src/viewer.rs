//! Event wiring of the plot viewer.
//!
//! A `Viewer` owns the plot session and every listener it registered.
//! Handlers hold weak references, so dropping the viewer detaches it.

use crate::{
    document_viewport, optional, required, set_attr, set_shown, window, DomError, DomResult,
    SvgPlotScene, ViewerConfig,
};
use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use sigmet_charts::{resize_viewport, CursorReadout, GeometryProvider, PlotSession};
use sigmet_core::{NavDirection, PixelPoint};
use sigmet_nav::NavClient;
use sigmet_state::{button_styles, ButtonStyle, ViewerState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, DomParser, Element, Event, MouseEvent, SupportedType};

// ============================================================================
// VIEWER
// ============================================================================

pub struct Viewer {
    inner: Rc<ViewerInner>,
}

struct ViewerInner {
    document: Document,
    outermost: Element,
    config: ViewerConfig,
    state: ViewerState,
    nav: NavClient,
    session: RefCell<PlotSession<SvgPlotScene>>,
    readout: RefCell<Option<CursorReadout>>,
    /// Move and up listeners of the drag in progress
    drag_listeners: RefCell<Vec<EventListener>>,
    listeners: RefCell<Vec<EventListener>>,
    resize_timer: RefCell<Option<Timeout>>,
    owner: Owner,
}

impl Viewer {
    /// Attach to the plot in `document`
    pub fn start(document: Document, config: ViewerConfig) -> DomResult<Self> {
        let outermost = required(&document, "outermost")?;
        let scene = SvgPlotScene::load(&document, &config)?;
        let session = PlotSession::new(scene, config.labels);

        let url = window()?.location().href()?;
        let owner = Owner::new();
        let state = owner.with(|| ViewerState::new(url));
        let nav = NavClient::with_config(state.volume, config.nav.clone());

        let inner = Rc::new(ViewerInner {
            document,
            outermost,
            config,
            state,
            nav,
            session: RefCell::new(session),
            readout: RefCell::new(None),
            drag_listeners: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            resize_timer: RefCell::new(None),
            owner,
        });
        inner.load_readout();

        let viewer = Self { inner };
        viewer.wire_plot()?;
        viewer.wire_zoom();
        viewer.wire_navigation();
        viewer.bind_state();

        if viewer.inner.config.keep_margins {
            viewer.wire_resize()?;
            viewer.inner.fit_to_window();
        } else if let Err(e) = viewer.inner.session.borrow_mut().redraw() {
            tracing::warn!("Initial redraw failed: {}", e);
        }
        viewer.inner.nav.refresh_index();

        tracing::info!("SIGMET viewer started");
        Ok(viewer)
    }

    pub fn state(&self) -> ViewerState {
        self.inner.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.inner.config
    }

    fn listen(&self, listener: EventListener) {
        self.inner.listeners.borrow_mut().push(listener);
    }

    /// Drag and cursor readout on the plot element
    fn wire_plot(&self) -> DomResult<()> {
        let plot = required(&self.inner.document, "plot")?;

        let weak = Rc::downgrade(&self.inner);
        let target = plot.clone();
        self.listen(EventListener::new(&plot, "mousedown", move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(point) = inner.mouse_point(event) {
                inner.start_drag(&target, point);
            }
        }));

        let weak = Rc::downgrade(&self.inner);
        self.listen(EventListener::new(&plot, "mousemove", move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(point) = inner.mouse_point(event) {
                inner.update_cursor(point);
            }
        }));
        Ok(())
    }

    fn wire_zoom(&self) {
        let buttons = [
            ("zoom_in", self.inner.config.zoom_in_factor),
            ("zoom_out", self.inner.config.zoom_out_factor),
        ];
        for (id, factor) in buttons {
            let Some(button) = optional(&self.inner.document, id) else {
                continue;
            };
            let weak = Rc::downgrade(&self.inner);
            self.listen(EventListener::new(&button, "click", move |_| {
                if let Some(inner) = weak.upgrade() {
                    if let Err(e) = inner.session.borrow_mut().zoom(factor) {
                        tracing::warn!("Zoom by {} failed: {}", factor, e);
                    }
                }
            }));
        }
    }

    /// Debounced window resize
    fn wire_resize(&self) -> DomResult<()> {
        let weak = Rc::downgrade(&self.inner);
        let delay = self.inner.config.resize_debounce_ms;

        let window: web_sys::Window = window()?;
        self.listen(EventListener::new(&window, "resize", move |_| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let pending = Rc::downgrade(&inner);
            // Replacing the timeout cancels the previous one
            *inner.resize_timer.borrow_mut() = Some(Timeout::new(delay, move || {
                if let Some(inner) = pending.upgrade() {
                    inner.fit_to_window();
                }
            }));
        }));
        Ok(())
    }

    fn wire_navigation(&self) {
        for direction in [NavDirection::Previous, NavDirection::Next] {
            let Some(button) = optional(&self.inner.document, button_id(direction)) else {
                continue;
            };
            let weak = Rc::downgrade(&self.inner);
            self.listen(EventListener::new(&button, "click", move |_| {
                if let Some(inner) = weak.upgrade() {
                    ViewerInner::navigate(inner, direction);
                }
            }));
        }
    }

    /// Effects mirroring the reactive state into the document
    fn bind_state(&self) {
        let inner = &self.inner;
        let volume = inner.state.volume;
        let cursor_text = inner.state.cursor_text;
        let prev = optional(&inner.document, button_id(NavDirection::Previous));
        let next = optional(&inner.document, button_id(NavDirection::Next));
        let updating = optional(&inner.document, "updating");
        let cursor_loc = optional(&inner.document, "cursor_loc");

        inner.owner.with(|| {
            if prev.is_some() || next.is_some() {
                Effect::new(move |_| {
                    for (direction, style) in button_styles(volume.nav_buttons()) {
                        let button = match direction {
                            NavDirection::Previous => prev.as_ref(),
                            NavDirection::Next => next.as_ref(),
                        };
                        if let Some(button) = button {
                            color_button(button, style);
                        }
                    }
                });
            }

            if let Some(updating) = updating {
                Effect::new(move |_| set_shown(&updating, volume.updating.get()));
            }

            if let Some(cursor_loc) = cursor_loc {
                Effect::new(move |_| {
                    if let Some(text) = cursor_text.get() {
                        cursor_loc.set_text_content(Some(&text));
                    }
                });
            }
        });
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

impl ViewerInner {
    /// Parse the caption into a cursor readout, if the document has a
    /// readout element
    fn load_readout(&self) {
        let readout = optional(&self.document, "cursor_loc").and_then(|_| {
            let text = optional(&self.document, "caption")?.text_content()?;
            CursorReadout::from_caption_text(&text)
                .map_err(|e| tracing::debug!("Cursor readout disabled: {}", e))
                .ok()
        });
        if readout.is_none() {
            self.state.clear_cursor_text();
        }
        *self.readout.borrow_mut() = readout;
    }

    /// Pointer position of a mouse event in outer SVG pixels
    fn mouse_point(&self, event: &Event) -> Option<PixelPoint> {
        let event = event.dyn_ref::<MouseEvent>()?;
        let rect = self.outermost.get_bounding_client_rect();
        Some(PixelPoint::new(
            event.client_x() as f64 - rect.left(),
            event.client_y() as f64 - rect.top(),
        ))
    }

    fn start_drag(self: &Rc<Self>, plot: &Element, point: PixelPoint) {
        self.session.borrow_mut().drag_start(point);

        let weak = Rc::downgrade(self);
        let on_move = EventListener::new(plot, "mousemove", move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(point) = inner.mouse_point(event) {
                inner.session.borrow_mut().drag_move(point);
            }
        });

        let weak = Rc::downgrade(self);
        let on_up = EventListener::new(plot, "mouseup", move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(point) = inner.mouse_point(event) {
                inner.end_drag(point);
            }
        });

        *self.drag_listeners.borrow_mut() = vec![on_move, on_up];
    }

    fn end_drag(&self, point: PixelPoint) {
        match self.session.borrow_mut().drag_end(point) {
            Ok(true) => {}
            Ok(false) => tracing::trace!("mouseup without drag"),
            Err(e) => tracing::warn!("Drag failed: {}", e),
        }

        // The listeners cannot be dropped while one of them is running
        let listeners = std::mem::take(&mut *self.drag_listeners.borrow_mut());
        spawn_local(async move { drop(listeners) });
    }

    fn update_cursor(&self, point: PixelPoint) {
        let Some(readout) = *self.readout.borrow() else {
            return;
        };
        match self.session.borrow().cursor_position(point) {
            Ok((x, y)) => self.state.set_cursor_text(readout.locate(x, y).to_string()),
            Err(e) => tracing::trace!("No cursor position: {}", e),
        }
    }

    /// Resize the plot to the window, keeping the margins
    fn fit_to_window(&self) {
        let Ok(window) = window() else {
            return;
        };
        let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value.ok().and_then(|v| v.as_f64())
        };
        let (Some(width), Some(height)) =
            (dimension(window.inner_width()), dimension(window.inner_height()))
        else {
            tracing::debug!("Window size unavailable");
            return;
        };

        let mut session = self.session.borrow_mut();
        let sizes = session.scene().layout().sizes(width, height);
        if let Err(e) = session.resize(sizes.plot_width, sizes.plot_height) {
            tracing::debug!("Plot not resized: {}", e);
        }
    }

    fn navigate(self: Rc<Self>, direction: NavDirection) {
        let volume = self.state.volume;
        if volume.is_updating() {
            tracing::debug!("Navigation ignored, update in progress");
            return;
        }
        let Some(url) = volume.neighbor_url(direction) else {
            tracing::debug!("No {} volume", direction.label());
            return;
        };

        volume.begin_update();
        spawn_local(async move {
            let source = match self.nav.fetch_volume(&url).await {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("Could not fetch {}: {}", url, e);
                    volume.update_failed();
                    return;
                }
            };

            match self.install_volume(&source) {
                Ok(true) => {
                    tracing::info!("Showing {}", url);
                    volume.volume_loaded(url);
                    self.nav.refresh_index();
                }
                Ok(false) => {
                    tracing::warn!("{} has no plot elements or caption", url);
                    volume.update_failed();
                }
                Err(e) => {
                    tracing::warn!("Could not install {}: {}", url, e);
                    volume.update_failed();
                }
            }
        });
    }

    /// Swap the title, caption and plot elements for those of an SVG source;
    /// returns false if the source lacks them
    fn install_volume(&self, source: &str) -> DomResult<bool> {
        let parser = DomParser::new()?;
        let incoming = parser.parse_from_string(source, SupportedType::ImageSvgXml)?;
        let (Some(plot_elements), Some(caption)) = (
            incoming.get_element_by_id("plotElements"),
            incoming.get_element_by_id("caption"),
        ) else {
            return Ok(false);
        };
        let incoming_view = document_viewport(&incoming);

        if let (Some(title), Some(new_title)) = (
            optional(&self.document, "docTitle"),
            incoming.get_element_by_id("docTitle"),
        ) {
            title.set_text_content(new_title.text_content().as_deref());
        }
        replace_element(&self.document, "caption", &caption)?;
        replace_element(&self.document, "plotElements", &plot_elements)?;

        {
            let mut session = self.session.borrow_mut();
            session.scene_mut().reattach(&self.document)?;
            match incoming_view {
                Ok((viewport, width, height)) => {
                    let frame = session.scene().frame();
                    let viewport =
                        resize_viewport(&viewport, (width, height), (frame.width, frame.height));
                    session.set_viewport(viewport)?;
                }
                Err(e) => {
                    tracing::debug!("Keeping viewport, new volume has none: {}", e);
                    session.redraw()?;
                }
            }
        }

        self.load_readout();
        Ok(true)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn button_id(direction: NavDirection) -> &'static str {
    match direction {
        NavDirection::Previous => "prev_vol",
        NavDirection::Next => "next_vol",
    }
}

/// Stroke the outline, text and arrow of a navigation button
fn color_button(button: &Element, style: ButtonStyle) {
    let children = button.children();
    for i in 0..children.length() {
        let Some(child) = children.item(i) else {
            continue;
        };
        let tag = child.tag_name();
        if matches!(tag.as_str(), "rect" | "text" | "line") {
            set_attr(&child, "stroke", style.stroke());
        }
        if tag == "line" {
            set_attr(&child, "marker-end", style.marker());
        }
    }
}

fn replace_element(document: &Document, id: &str, replacement: &Element) -> DomResult<()> {
    let current = required(document, id)?;
    let parent = current
        .parent_node()
        .ok_or_else(|| DomError::MissingElement(format!("parent of #{}", id)))?;
    parent.replace_child(replacement, &current)?;
    Ok(())
}
