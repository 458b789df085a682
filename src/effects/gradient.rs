//! Slowly rotating full-page background gradient.
//!
//! The loop rides on `requestAnimationFrame` but commits a repaint at most
//! every `min_interval_ms`. It pauses while the tab is hidden.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement, Window};

use crate::config::GradientConfig;
use crate::dom;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// New angle to paint, if this frame committed one.
    pub paint: Option<f64>,
    pub reschedule: bool,
}

#[derive(Debug)]
pub struct GradientLoop {
    angle: f64,
    last_commit: Option<f64>,
    state: LoopState,
    scheduled: bool,
    step_deg: f64,
    min_interval_ms: f64,
}

impl GradientLoop {
    pub fn new(step_deg: f64, min_interval_ms: f64) -> Self {
        Self {
            angle: 0.0,
            last_commit: None,
            state: LoopState::Idle,
            scheduled: false,
            step_deg,
            min_interval_ms,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Returns true when the caller must request a frame.
    pub fn start(&mut self) -> bool {
        self.state = LoopState::Running;
        if self.scheduled {
            false
        } else {
            self.scheduled = true;
            true
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
        }
    }

    /// The host refused the frame request; the next `start` may retry.
    pub fn frame_request_failed(&mut self) {
        self.scheduled = false;
    }

    pub fn on_frame(&mut self, now_ms: f64) -> FrameOutcome {
        self.scheduled = false;
        if self.state != LoopState::Running {
            return FrameOutcome {
                paint: None,
                reschedule: false,
            };
        }

        let due = match self.last_commit {
            Some(last) => now_ms - last >= self.min_interval_ms,
            None => true,
        };
        let paint = if due {
            self.angle += self.step_deg;
            self.last_commit = Some(now_ms);
            Some(self.angle)
        } else {
            None
        };

        self.scheduled = true;
        FrameOutcome {
            paint,
            reschedule: true,
        }
    }
}

pub fn gradient_css(angle: f64, colors: &[String]) -> String {
    format!("linear-gradient({}deg, {})", angle, colors.join(", "))
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[derive(Clone)]
pub struct GradientHandle {
    window: Window,
    state: Rc<RefCell<GradientLoop>>,
    frame: FrameCallback,
}

impl GradientHandle {
    fn new(window: &Window, target: HtmlElement, config: &GradientConfig) -> Self {
        let state = Rc::new(RefCell::new(GradientLoop::new(
            config.step_deg,
            config.min_interval_ms,
        )));
        let frame: FrameCallback = Rc::new(RefCell::new(None));

        let callback = {
            let window = window.clone();
            let state = state.clone();
            let frame = frame.clone();
            let colors = config.colors.clone();
            Closure::wrap(Box::new(move |now: f64| {
                let outcome = state.borrow_mut().on_frame(now);
                if let Some(angle) = outcome.paint {
                    dom::set_style(&target, "background", &gradient_css(angle, &colors));
                }
                if outcome.reschedule {
                    if let Some(callback) = frame.borrow().as_ref() {
                        if let Err(e) = dom::request_animation_frame(&window, callback) {
                            warn!("gradient loop halted: {}", e);
                            state.borrow_mut().frame_request_failed();
                        }
                    }
                }
            }) as Box<dyn FnMut(f64)>)
        };
        *frame.borrow_mut() = Some(callback);

        Self {
            window: window.clone(),
            state,
            frame,
        }
    }

    pub fn start(&self) {
        if !self.state.borrow_mut().start() {
            return;
        }
        if let Some(callback) = self.frame.borrow().as_ref() {
            if let Err(e) = dom::request_animation_frame(&self.window, callback) {
                warn!("could not start gradient loop: {}", e);
                self.state.borrow_mut().frame_request_failed();
            }
        }
    }

    pub fn stop(&self) {
        let mut gradient = self.state.borrow_mut();
        gradient.stop();
        debug!("gradient loop {:?} at {}deg", gradient.state(), gradient.angle());
    }
}

pub fn mount(window: &Window, document: &Document, config: &GradientConfig) -> Result<Option<GradientHandle>> {
    if !config.enabled {
        return Ok(None);
    }
    let Some(body) = document.body() else {
        debug!("no body, gradient loop disabled");
        return Ok(None);
    };

    let handle = GradientHandle::new(window, body, config);
    handle.start();

    {
        let handle = handle.clone();
        let document_for_check = document.clone();
        dom::listen(document, "visibilitychange", move |_| {
            if document_for_check.hidden() {
                handle.stop();
            } else {
                handle.start();
            }
        })?;
    }

    Ok(Some(handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_started() {
        let mut gradient = GradientLoop::new(1.0, 100.0);
        assert_eq!(gradient.state(), LoopState::Idle);
        let outcome = gradient.on_frame(0.0);
        assert_eq!(outcome.paint, None);
        assert!(!outcome.reschedule);
    }

    #[test]
    fn commits_at_most_every_interval() {
        let mut gradient = GradientLoop::new(1.0, 100.0);
        assert!(gradient.start());

        assert_eq!(gradient.on_frame(0.0).paint, Some(1.0));
        assert_eq!(gradient.on_frame(16.0).paint, None);
        assert_eq!(gradient.on_frame(99.9).paint, None);
        assert_eq!(gradient.on_frame(100.0).paint, Some(2.0));
        assert_eq!(gradient.on_frame(150.0).paint, None);
        assert_eq!(gradient.on_frame(216.0).paint, Some(3.0));
    }

    #[test]
    fn angle_never_decreases() {
        let mut gradient = GradientLoop::new(1.0, 100.0);
        gradient.start();
        let mut last = gradient.angle();
        for frame in 0..2000 {
            gradient.on_frame(frame as f64 * 16.7);
            assert!(gradient.angle() >= last);
            last = gradient.angle();
        }
        assert!(last > 200.0);
    }

    #[test]
    fn stop_halts_and_restart_keeps_angle() {
        let mut gradient = GradientLoop::new(1.0, 100.0);
        gradient.start();
        gradient.on_frame(0.0);
        gradient.on_frame(100.0);
        gradient.stop();
        assert_eq!(gradient.state(), LoopState::Stopped);

        let outcome = gradient.on_frame(200.0);
        assert_eq!(outcome.paint, None);
        assert!(!outcome.reschedule);
        assert_eq!(gradient.angle(), 2.0);

        assert!(gradient.start());
        assert_eq!(gradient.on_frame(300.0).paint, Some(3.0));
    }

    #[test]
    fn start_does_not_double_schedule() {
        let mut gradient = GradientLoop::new(1.0, 100.0);
        assert!(gradient.start());
        gradient.stop();
        // The frame requested by the first start is still in flight
        assert!(!gradient.start());
        assert!(gradient.on_frame(0.0).reschedule);
    }

    #[test]
    fn failed_frame_request_can_be_retried() {
        let mut gradient = GradientLoop::new(1.0, 100.0);
        assert!(gradient.start());
        gradient.frame_request_failed();
        assert!(gradient.start());

        assert!(gradient.on_frame(0.0).reschedule);
        gradient.frame_request_failed();
        gradient.stop();
        // Resuming after a hidden tab must schedule again
        assert!(gradient.start());
        assert_eq!(gradient.on_frame(100.0).paint, Some(2.0));
    }

    #[test]
    fn css_lists_all_colors() {
        let colors = vec!["#667eea".to_string(), "#764ba2".to_string()];
        assert_eq!(gradient_css(45.0, &colors), "linear-gradient(45deg, #667eea, #764ba2)");
    }
}
