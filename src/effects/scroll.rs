//! Scroll-reactive styling: navbar background, parallax shapes and hero drift.
//!
//! A single passive scroll listener feeds a [`FrameGate`], so the styles are
//! recomputed at most once per rendered frame no matter how many scroll
//! events the browser delivers in between.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement, Window};

use crate::config::{NavbarMode, ScrollConfig};
use crate::dom;
use crate::error::Result;

const SOLID_BACKGROUND: &str = "rgba(102, 126, 234, 0.95)";
const GRADIENT_BACKGROUND: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";
const SOLID_BLUR_PX: f64 = 10.0;
const ROTATION_FACTOR: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct NavbarStyle {
    pub background: String,
    pub backdrop_filter: String,
}

impl NavbarStyle {
    pub fn compute(scroll_y: f64, config: &ScrollConfig) -> Self {
        match config.navbar_mode {
            NavbarMode::Threshold => {
                if scroll_y > config.threshold {
                    Self {
                        background: SOLID_BACKGROUND.to_string(),
                        backdrop_filter: format!("blur({}px)", SOLID_BLUR_PX),
                    }
                } else {
                    Self {
                        background: GRADIENT_BACKGROUND.to_string(),
                        backdrop_filter: "none".to_string(),
                    }
                }
            }
            NavbarMode::Ramp => {
                let opacity = ramp_opacity(scroll_y, config.ramp_distance, config.max_opacity);
                let blur = if config.max_opacity > 0.0 {
                    SOLID_BLUR_PX * opacity / config.max_opacity
                } else {
                    0.0
                };
                Self {
                    background: format!("rgba(102, 126, 234, {:.3})", opacity),
                    backdrop_filter: if blur > 0.0 {
                        format!("blur({:.1}px)", blur)
                    } else {
                        "none".to_string()
                    },
                }
            }
        }
    }
}

/// Linear in scroll distance, capped at `max_opacity`.
pub fn ramp_opacity(scroll_y: f64, ramp_distance: f64, max_opacity: f64) -> f64 {
    if ramp_distance <= 0.0 {
        return max_opacity;
    }
    (scroll_y.max(0.0) / ramp_distance * max_opacity).min(max_opacity)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxTransform {
    pub translate_y: f64,
    pub rotate_deg: f64,
}

impl ParallaxTransform {
    pub fn compute(scroll_y: f64, index: usize, config: &ScrollConfig) -> Self {
        let speed = config.parallax_base + index as f64 * config.parallax_step;
        Self {
            translate_y: scroll_y * speed,
            rotate_deg: scroll_y * speed * ROTATION_FACTOR,
        }
    }

    pub fn to_css(self) -> String {
        format!("translateY({}px) rotate({}deg)", self.translate_y, self.rotate_deg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroOffsets {
    pub text_y: f64,
    pub visual_y: f64,
}

impl HeroOffsets {
    /// Only defined while the hero is still within the first viewport.
    pub fn compute(scroll_y: f64, viewport_height: f64, config: &ScrollConfig) -> Option<Self> {
        if scroll_y < viewport_height {
            Some(Self {
                text_y: scroll_y * config.hero_text_speed,
                visual_y: scroll_y * config.hero_visual_speed,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollFrame {
    pub navbar: NavbarStyle,
    pub parallax: Vec<ParallaxTransform>,
    pub hero: Option<HeroOffsets>,
}

impl ScrollFrame {
    pub fn compute(scroll_y: f64, viewport_height: f64, shape_count: usize, config: &ScrollConfig) -> Self {
        Self {
            navbar: NavbarStyle::compute(scroll_y, config),
            parallax: (0..shape_count)
                .map(|index| ParallaxTransform::compute(scroll_y, index, config))
                .collect(),
            hero: HeroOffsets::compute(scroll_y, viewport_height, config),
        }
    }
}

/// Collapses bursts of scroll events into one recompute per animation frame.
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Returns true when the caller has to schedule a frame.
    pub fn request(&mut self) -> bool {
        if self.pending {
            false
        } else {
            self.pending = true;
            true
        }
    }

    pub fn begin_frame(&mut self) {
        self.pending = false;
    }
}

struct ScrollTargets {
    navbar: Option<HtmlElement>,
    shapes: Vec<HtmlElement>,
    hero_text: Option<HtmlElement>,
    hero_visual: Option<HtmlElement>,
}

impl ScrollTargets {
    fn apply(&self, frame: &ScrollFrame) {
        if let Some(navbar) = &self.navbar {
            dom::set_style(navbar, "background", &frame.navbar.background);
            dom::set_style(navbar, "backdrop-filter", &frame.navbar.backdrop_filter);
        }

        for (shape, transform) in self.shapes.iter().zip(&frame.parallax) {
            dom::set_style(shape, "transform", &transform.to_css());
        }

        if let Some(hero) = frame.hero {
            if let Some(text) = &self.hero_text {
                dom::set_style(text, "transform", &format!("translateY({}px)", hero.text_y));
            }
            if let Some(visual) = &self.hero_visual {
                dom::set_style(visual, "transform", &format!("translateY({}px)", hero.visual_y));
            }
        }
    }
}

pub fn mount(window: &Window, document: &Document, config: &ScrollConfig) -> Result<()> {
    let targets = ScrollTargets {
        navbar: dom::query(document, &config.navbar),
        shapes: dom::query_all(document, &config.shapes),
        hero_text: dom::query(document, &config.hero_text),
        hero_visual: dom::query(document, &config.hero_visual),
    };
    if targets.navbar.is_none() {
        debug!("no navbar matched {}", config.navbar);
    }
    debug!("parallax shapes: {}", targets.shapes.len());

    let gate = Rc::new(RefCell::new(FrameGate::default()));
    let render = {
        let window = window.clone();
        let gate = gate.clone();
        let config = config.clone();
        move || {
            gate.borrow_mut().begin_frame();
            let frame = ScrollFrame::compute(
                dom::scroll_y(&window),
                dom::viewport_height(&window),
                targets.shapes.len(),
                &config,
            );
            targets.apply(&frame);
        }
    };
    let render = Rc::new(render);

    let on_frame = {
        let render = render.clone();
        Rc::new(Closure::wrap(Box::new(move |_timestamp: f64| {
            render();
        }) as Box<dyn FnMut(f64)>))
    };

    // Initial paint for pages restored mid-scroll
    render();

    let window_for_frames = window.clone();
    dom::listen_passive(window, "scroll", move |_| {
        if gate.borrow_mut().request() {
            if let Err(e) = dom::request_animation_frame(&window_for_frames, &on_frame) {
                debug!("requestAnimationFrame failed: {}", e);
                gate.borrow_mut().begin_frame();
            }
        }
    })?;

    Ok(())
}
