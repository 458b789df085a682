use gloo_timers::callback::Timeout;
use log::debug;
use web_sys::{Document, HtmlElement};

use crate::config::RippleConfig;
use crate::dom;
use crate::error::Result;

/// Square overlay centred on the click, in the button's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    pub fn from_local_click(local_x: f64, local_y: f64, width: f64, height: f64) -> Self {
        let size = width.max(height);
        Self {
            size,
            left: local_x - size / 2.0,
            top: local_y - size / 2.0,
        }
    }

    pub fn to_style(self) -> String {
        format!(
            "width: {size}px; height: {size}px; left: {left}px; top: {top}px;",
            size = self.size,
            left = self.left,
            top = self.top,
        )
    }
}

fn spawn_ripple(document: &Document, button: &HtmlElement, client_x: f64, client_y: f64, config: &RippleConfig) -> Result<()> {
    let rect = button.get_bounding_client_rect();
    let geometry = RippleGeometry::from_local_click(
        client_x - rect.left(),
        client_y - rect.top(),
        rect.width(),
        rect.height(),
    );

    let ripple = document.create_element("span")?;
    ripple.set_class_name(&config.class_name);
    ripple.set_attribute("style", &geometry.to_style())?;
    button.append_child(&ripple)?;

    Timeout::new(config.lifetime_ms, move || {
        ripple.remove();
    })
    .forget();
    Ok(())
}

pub fn mount(document: &Document, config: &RippleConfig) -> Result<()> {
    let buttons = dom::query_all::<HtmlElement>(document, &config.selector);
    debug!("ripple buttons: {}", buttons.len());

    for button in buttons {
        let document = document.clone();
        let config = config.clone();
        let target = button.clone();
        dom::listen_mouse(&button, "click", move |event| {
            let x = event.client_x() as f64;
            let y = event.client_y() as f64;
            if let Err(e) = spawn_ripple(&document, &target, x, y, &config) {
                debug!("ripple skipped: {}", e);
            }
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ripple_uses_larger_dimension() {
        let geometry = RippleGeometry::from_local_click(20.0, 10.0, 100.0, 40.0);
        assert_eq!(geometry.size, 100.0);
        assert_eq!(geometry.left, -30.0);
        assert_eq!(geometry.top, -40.0);
    }

    #[test]
    fn tall_buttons_use_height() {
        let geometry = RippleGeometry::from_local_click(15.0, 60.0, 30.0, 120.0);
        assert_eq!(geometry.size, 120.0);
        assert_eq!(geometry.left, -45.0);
        assert_eq!(geometry.top, 0.0);
    }

    #[test]
    fn style_positions_overlay() {
        let style = RippleGeometry::from_local_click(20.0, 10.0, 100.0, 40.0).to_style();
        assert_eq!(style, "width: 100px; height: 100px; left: -30px; top: -40px;");
    }
}
