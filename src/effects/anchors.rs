use log::debug;
use web_sys::{Document, Element, HtmlAnchorElement, ScrollBehavior, ScrollToOptions, Window};

use crate::config::AnchorConfig;
use crate::dom;
use crate::error::Result;

/// Page offset to scroll to so the target sits just below a fixed header.
pub fn scroll_destination(element_top: f64, page_offset: f64, header_offset: f64) -> f64 {
    (element_top + page_offset - header_offset).max(0.0)
}

/// Only in-page fragments name a target; a bare `#` does not.
pub fn fragment_selector(href: &str) -> Option<&str> {
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

fn smooth_scroll_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

pub fn mount(window: &Window, document: &Document, config: &AnchorConfig) -> Result<()> {
    let anchors = dom::query_all::<HtmlAnchorElement>(document, &config.selector);
    debug!("smooth scrolling {} anchors", anchors.len());

    for anchor in anchors {
        let window = window.clone();
        let document = document.clone();
        let header_offset = config.header_offset;
        let href_source = anchor.clone();
        dom::listen(&anchor, "click", move |event| {
            event.prevent_default();
            let href = href_source.get_attribute("href").unwrap_or_default();
            let Some(selector) = fragment_selector(&href) else {
                return;
            };
            let Some(target) = dom::query::<Element>(&document, selector) else {
                return;
            };
            let top = scroll_destination(
                target.get_bounding_client_rect().top(),
                window.page_y_offset().unwrap_or(0.0),
                header_offset,
            );
            smooth_scroll_to(&window, top);
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_accounts_for_header() {
        assert_eq!(scroll_destination(400.0, 1200.0, 80.0), 1520.0);
        assert_eq!(scroll_destination(-300.0, 1200.0, 80.0), 820.0);
    }

    #[test]
    fn destination_never_negative() {
        assert_eq!(scroll_destination(20.0, 0.0, 80.0), 0.0);
    }

    #[test]
    fn bare_hash_has_no_target() {
        assert_eq!(fragment_selector("#"), None);
        assert_eq!(fragment_selector(""), None);
        assert_eq!(fragment_selector("/pricing"), None);
        assert_eq!(fragment_selector("#contact"), Some("#contact"));
    }
}
