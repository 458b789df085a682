use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Node};

use crate::config::NavConfig;
use crate::dom;
use crate::error::Result;

/// Open/closed state of the mobile menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self.open
    }

    /// Scroll is locked exactly while the menu is open.
    pub fn scroll_locked(self) -> bool {
        self.open
    }

    pub fn toggle(self) -> Self {
        Self { open: !self.open }
    }

    pub fn close(self) -> Self {
        Self { open: false }
    }

    /// Clicks landing outside both the trigger and the menu close it.
    pub fn on_document_click(self, inside_trigger: bool, inside_menu: bool) -> Self {
        if self.open && !inside_trigger && !inside_menu {
            self.close()
        } else {
            self
        }
    }
}

struct NavElements {
    trigger: HtmlElement,
    menu: HtmlElement,
    body: Option<HtmlElement>,
    active_class: String,
}

impl NavElements {
    fn apply(&self, state: MenuState) {
        for element in [&self.trigger, &self.menu] {
            let _ = element
                .class_list()
                .toggle_with_force(&self.active_class, state.is_open());
        }
        if let Some(body) = &self.body {
            if state.scroll_locked() {
                dom::set_style(body, "overflow", "hidden");
            } else {
                let _ = body.style().remove_property("overflow");
            }
        }
    }
}

pub fn mount(document: &Document, config: &NavConfig) -> Result<()> {
    let (Some(trigger), Some(menu)) = (
        dom::query::<HtmlElement>(document, &config.trigger),
        dom::query::<HtmlElement>(document, &config.menu),
    ) else {
        debug!("mobile nav not present, skipping");
        return Ok(());
    };

    let elements = Rc::new(NavElements {
        trigger: trigger.clone(),
        menu: menu.clone(),
        body: document.body(),
        active_class: config.active_class.clone(),
    });
    let state = Rc::new(RefCell::new(MenuState::default()));

    {
        let elements = elements.clone();
        let state = state.clone();
        dom::listen(&trigger, "click", move |_| {
            let next = state.borrow().toggle();
            *state.borrow_mut() = next;
            elements.apply(next);
            debug!("mobile menu open: {}", next.is_open());
        })?;
    }

    for link in dom::query_all::<HtmlElement>(document, &config.links) {
        let elements = elements.clone();
        let state = state.clone();
        dom::listen(&link, "click", move |_| {
            let next = state.borrow().close();
            *state.borrow_mut() = next;
            elements.apply(next);
        })?;
    }

    {
        let elements = elements.clone();
        let state = state.clone();
        dom::listen(document, "click", move |event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside = |container: &HtmlElement| container.contains(target.as_ref());
            let current = *state.borrow();
            let next = current.on_document_click(inside(&elements.trigger), inside(&elements.menu));
            if next != current {
                *state.borrow_mut() = next;
                elements.apply(next);
            }
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_click_flips_state_once() {
        let mut state = MenuState::default();
        for _ in 0..5 {
            let before = state.is_open();
            state = state.toggle();
            assert_eq!(state.is_open(), !before);
        }
    }

    #[test]
    fn link_click_closes_idempotently() {
        let open = MenuState::default().toggle();
        let closed = open.close();
        assert!(!closed.is_open());
        assert_eq!(closed.close(), closed);
        assert_eq!(closed.close().close(), closed);
    }

    #[test]
    fn hamburger_locks_scroll_while_open() {
        let opened = MenuState::default().toggle();
        assert!(opened.is_open());
        assert!(opened.scroll_locked());

        let closed = opened.toggle();
        assert!(!closed.is_open());
        assert!(!closed.scroll_locked());
    }

    #[test]
    fn outside_click_only_closes_open_menu() {
        let open = MenuState::default().toggle();
        assert!(!open.on_document_click(false, false).is_open());
        assert!(open.on_document_click(true, false).is_open());
        assert!(open.on_document_click(false, true).is_open());

        let closed = MenuState::default();
        assert_eq!(closed.on_document_click(false, false), closed);
    }
}
