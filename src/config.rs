use log::Level;
use serde::Deserialize;
use web_sys::Document;

use crate::error::Result;

/// Id of the optional inline JSON block that overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "site-effects-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EffectsConfig {
    pub nav: NavConfig,
    pub anchors: AnchorConfig,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    pub gradient: GradientConfig,
    pub ripple: RippleConfig,
    pub hover: HoverConfig,
    pub notification: NotificationConfig,
    pub typewriter: TypewriterConfig,
    pub clipboard: ClipboardConfig,
}

impl EffectsConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the inline config block if the page has one.
    pub fn from_document(document: &Document) -> Result<Self> {
        match document.get_element_by_id(CONFIG_ELEMENT_ID) {
            Some(element) => {
                let raw = element.text_content().unwrap_or_default();
                if raw.trim().is_empty() {
                    Ok(Self::default())
                } else {
                    Self::from_json(&raw)
                }
            }
            None => Ok(Self::default()),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NavConfig {
    pub trigger: String,
    pub menu: String,
    pub links: String,
    pub active_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            trigger: "#mobile-menu".to_string(),
            menu: ".nav-menu".to_string(),
            links: ".nav-link".to_string(),
            active_class: "active".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnchorConfig {
    pub selector: String,
    pub header_offset: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            selector: "a[href^=\"#\"]".to_string(),
            header_offset: 80.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NavbarMode {
    /// Solid background once past `threshold`, gradient otherwise.
    Threshold,
    /// Background opacity grows with scroll distance up to `max_opacity`.
    Ramp,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    pub navbar: String,
    pub navbar_mode: NavbarMode,
    pub threshold: f64,
    pub ramp_distance: f64,
    pub max_opacity: f64,
    pub shapes: String,
    pub parallax_base: f64,
    pub parallax_step: f64,
    pub hero_text: String,
    pub hero_visual: String,
    pub hero_text_speed: f64,
    pub hero_visual_speed: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            navbar: ".navbar".to_string(),
            navbar_mode: NavbarMode::Threshold,
            threshold: 50.0,
            ramp_distance: 300.0,
            max_opacity: 0.95,
            shapes: ".floating-shape".to_string(),
            parallax_base: 0.5,
            parallax_step: 0.1,
            hero_text: ".hero-text".to_string(),
            hero_visual: ".hero-visual".to_string(),
            hero_text_speed: 0.3,
            hero_visual_speed: 0.15,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f64,
    pub root_margin: String,
    pub animation: String,
    pub initial_offset: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".service-card, .pricing-category, .contact-item".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            animation: "fadeInUp 0.6s ease forwards".to_string(),
            initial_offset: 30.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GradientConfig {
    pub enabled: bool,
    pub step_deg: f64,
    pub min_interval_ms: f64,
    pub colors: Vec<String>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            step_deg: 1.0,
            min_interval_ms: 100.0,
            colors: vec![
                "#667eea".to_string(),
                "#764ba2".to_string(),
                "#f093fb".to_string(),
            ],
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RippleConfig {
    pub selector: String,
    pub class_name: String,
    pub lifetime_ms: u32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            selector: ".btn, .cta-button".to_string(),
            class_name: "ripple".to_string(),
            lifetime_ms: 600,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HoverConfig {
    pub tilt_selector: String,
    pub max_tilt_deg: f64,
    pub perspective_px: f64,
    pub pricing_rows: String,
    pub service_name: String,
    pub row_scale: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            tilt_selector: ".service-card".to_string(),
            max_tilt_deg: 10.0,
            perspective_px: 1000.0,
            pricing_rows: ".pricing-row".to_string(),
            service_name: ".service-name".to_string(),
            row_scale: 1.02,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    pub enter_delay_ms: u32,
    pub dismiss_after_ms: u32,
    pub exit_duration_ms: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: 100,
            dismiss_after_ms: 3000,
            exit_duration_ms: 400,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TypewriterConfig {
    pub selector: String,
    pub start_delay_ms: u32,
    pub interval_ms: u32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            selector: "[data-typewriter]".to_string(),
            start_delay_ms: 1000,
            interval_ms: 100,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClipboardConfig {
    pub selector: String,
    pub attribute: String,
    pub success_message: String,
    pub failure_message: String,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            selector: "[data-copy]".to_string(),
            attribute: "data-copy".to_string(),
            success_message: "Contact info copied!".to_string(),
            failure_message: "Could not copy to clipboard".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EffectsConfig::from_json("{}").unwrap();
        assert_eq!(config, EffectsConfig::default());
        assert_eq!(config.anchors.header_offset, 80.0);
        assert_eq!(config.reveal.root_margin, "0px 0px -50px 0px");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = EffectsConfig::from_json(
            r#"{ "scroll": { "navbar_mode": "ramp", "threshold": 120 }, "ripple": { "lifetime_ms": 900 } }"#,
        )
        .unwrap();
        assert_eq!(config.scroll.navbar_mode, NavbarMode::Ramp);
        assert_eq!(config.scroll.threshold, 120.0);
        assert_eq!(config.scroll.navbar, ".navbar");
        assert_eq!(config.ripple.lifetime_ms, 900);
        assert_eq!(config.ripple.class_name, "ripple");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EffectsConfig::from_json("{ \"nav\": ").is_err());
    }
}
