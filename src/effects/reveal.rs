use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::RevealConfig;
use crate::dom;
use crate::error::Result;

const REVEAL_ID_ATTRIBUTE: &str = "data-reveal-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Watched,
    Revealed,
}

/// Tracks every observed element; each one may reveal exactly once.
#[derive(Debug, Default)]
pub struct RevealTracker {
    states: Vec<RevealState>,
}

impl RevealTracker {
    pub fn register(&mut self) -> usize {
        self.states.push(RevealState::Watched);
        self.states.len() - 1
    }

    /// Returns true only on the transition into `Revealed`.
    pub fn on_visibility(&mut self, id: usize, intersecting: bool) -> bool {
        match self.states.get_mut(id) {
            Some(state) if intersecting && *state == RevealState::Watched => {
                *state = RevealState::Revealed;
                true
            }
            _ => false,
        }
    }

    pub fn watched_count(&self) -> usize {
        self.states
            .iter()
            .filter(|state| **state == RevealState::Watched)
            .count()
    }
}

pub fn mount(document: &Document, config: &RevealConfig) -> Result<()> {
    let elements = dom::query_all::<HtmlElement>(document, &config.selector);
    if elements.is_empty() {
        debug!("nothing to reveal for {}", config.selector);
        return Ok(());
    }

    let tracker = Rc::new(RefCell::new(RevealTracker::default()));
    let animation = config.animation.clone();

    let callback = {
        let tracker = tracker.clone();
        Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    let Ok(target) = entry.target().dyn_into::<HtmlElement>() else {
                        continue;
                    };
                    let Some(id) = target
                        .get_attribute(REVEAL_ID_ATTRIBUTE)
                        .and_then(|raw| raw.parse::<usize>().ok())
                    else {
                        continue;
                    };
                    let mut tracker = tracker.borrow_mut();
                    if tracker.on_visibility(id, entry.is_intersecting()) {
                        dom::set_style(&target, "animation", &animation);
                        observer.unobserve(&target);
                        debug!("revealed #{}, {} still watched", id, tracker.watched_count());
                    }
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>)
    };

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.threshold));
    options.set_root_margin(&config.root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

    for element in &elements {
        let id = tracker.borrow_mut().register();
        element.set_attribute(REVEAL_ID_ATTRIBUTE, &id.to_string())?;
        dom::set_style(element, "opacity", "0");
        dom::set_style(element, "transform", &format!("translateY({}px)", config.initial_offset));
        observer.observe(element);
    }
    debug!("watching {} elements for reveal", elements.len());

    callback.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_at_most_once() {
        let mut tracker = RevealTracker::default();
        let id = tracker.register();

        assert!(!tracker.on_visibility(id, false));
        assert!(tracker.on_visibility(id, true));
        assert_eq!(tracker.watched_count(), 0);

        for visible in [false, true, false, true] {
            assert!(!tracker.on_visibility(id, visible));
        }
        assert_eq!(tracker.watched_count(), 0);
    }

    #[test]
    fn elements_reveal_independently() {
        let mut tracker = RevealTracker::default();
        let a = tracker.register();
        let b = tracker.register();
        assert_eq!(tracker.watched_count(), 2);

        assert!(tracker.on_visibility(b, true));
        assert_eq!(tracker.watched_count(), 1);
        assert!(tracker.on_visibility(a, true));
        assert_eq!(tracker.watched_count(), 0);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut tracker = RevealTracker::default();
        tracker.register();
        assert!(!tracker.on_visibility(7, true));
        assert_eq!(tracker.watched_count(), 1);
    }
}
