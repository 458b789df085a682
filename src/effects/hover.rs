//! Pointer feedback: 3D tilt on cards, scale-up and click logging on pricing rows.

use log::{debug, info};
use web_sys::{Document, HtmlElement};

use crate::config::HoverConfig;
use crate::dom;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    pub const FLAT: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    /// Maps the pointer offset from the card centre linearly onto
    /// `[-max_deg, max_deg]` for both axes.
    pub fn from_pointer(local_x: f64, local_y: f64, width: f64, height: f64, max_deg: f64) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::FLAT;
        }
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let dx = ((local_x - half_w) / half_w).clamp(-1.0, 1.0);
        let dy = ((local_y - half_h) / half_h).clamp(-1.0, 1.0);
        Self {
            // Pointer at the top edge tips the card back
            rotate_x: -dy * max_deg,
            rotate_y: dx * max_deg,
        }
    }

    pub fn to_css(self, perspective_px: f64) -> String {
        format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg)",
            perspective_px, self.rotate_x, self.rotate_y
        )
    }
}

pub fn scale_css(scale: f64) -> String {
    format!("scale({})", scale)
}

fn mount_tilt(document: &Document, config: &HoverConfig) -> Result<()> {
    for card in dom::query_all::<HtmlElement>(document, &config.tilt_selector) {
        let perspective = config.perspective_px;
        let max_deg = config.max_tilt_deg;

        {
            let target = card.clone();
            dom::listen(&card, "mouseenter", move |_| {
                dom::set_style(&target, "transition", "transform 0.1s ease");
            })?;
        }
        {
            let target = card.clone();
            dom::listen_mouse(&card, "mousemove", move |event| {
                let rect = target.get_bounding_client_rect();
                let tilt = Tilt::from_pointer(
                    event.client_x() as f64 - rect.left(),
                    event.client_y() as f64 - rect.top(),
                    rect.width(),
                    rect.height(),
                    max_deg,
                );
                dom::set_style(&target, "transform", &tilt.to_css(perspective));
            })?;
        }
        {
            let target = card.clone();
            dom::listen(&card, "mouseleave", move |_| {
                dom::set_style(&target, "transition", "transform 0.3s ease");
                dom::set_style(&target, "transform", &Tilt::FLAT.to_css(perspective));
            })?;
        }
    }
    Ok(())
}

fn mount_pricing_rows(document: &Document, config: &HoverConfig) -> Result<()> {
    let rows = dom::query_all::<HtmlElement>(document, &config.pricing_rows);
    debug!("pricing rows: {}", rows.len());

    for row in rows {
        let scale = config.row_scale;
        {
            let target = row.clone();
            dom::listen(&row, "mouseenter", move |_| {
                dom::set_style(&target, "transform", &scale_css(scale));
                dom::set_style(&target, "transition", "all 0.3s ease");
            })?;
        }
        {
            let target = row.clone();
            dom::listen(&row, "mouseleave", move |_| {
                dom::set_style(&target, "transform", &scale_css(1.0));
            })?;
        }
        {
            let target = row.clone();
            let name_selector = config.service_name.clone();
            dom::listen(&row, "click", move |_| {
                let service = target
                    .query_selector(&name_selector)
                    .ok()
                    .flatten()
                    .and_then(|name| name.text_content())
                    .unwrap_or_default();
                info!("User clicked on: {}", service.trim());
            })?;
        }
    }
    Ok(())
}

pub fn mount(document: &Document, config: &HoverConfig) -> Result<()> {
    mount_tilt(document, config)?;
    mount_pricing_rows(document, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_is_flat() {
        assert_eq!(Tilt::from_pointer(100.0, 50.0, 200.0, 100.0, 10.0), Tilt::FLAT);
    }

    #[test]
    fn corners_hit_the_limit() {
        let top_left = Tilt::from_pointer(0.0, 0.0, 200.0, 100.0, 10.0);
        assert_eq!(top_left.rotate_x, 10.0);
        assert_eq!(top_left.rotate_y, -10.0);

        let bottom_right = Tilt::from_pointer(200.0, 100.0, 200.0, 100.0, 10.0);
        assert_eq!(bottom_right.rotate_x, -10.0);
        assert_eq!(bottom_right.rotate_y, 10.0);
    }

    #[test]
    fn tilt_is_linear_and_clamped() {
        let quarter = Tilt::from_pointer(150.0, 50.0, 200.0, 100.0, 10.0);
        assert_eq!(quarter.rotate_y, 5.0);

        let outside = Tilt::from_pointer(500.0, -300.0, 200.0, 100.0, 10.0);
        assert_eq!(outside.rotate_y, 10.0);
        assert_eq!(outside.rotate_x, 10.0);
    }

    #[test]
    fn degenerate_card_stays_flat() {
        assert_eq!(Tilt::from_pointer(5.0, 5.0, 0.0, 100.0, 10.0), Tilt::FLAT);
    }

    #[test]
    fn css_output() {
        assert_eq!(
            Tilt::FLAT.to_css(1000.0),
            "perspective(1000px) rotateX(0deg) rotateY(0deg)"
        );
        assert_eq!(scale_css(1.02), "scale(1.02)");
    }
}
