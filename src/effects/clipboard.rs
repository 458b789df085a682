use log::{debug, warn};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::js_sys::Reflect;
use web_sys::{Document, HtmlElement, Window};

use crate::components::notification::{self, Severity};
use crate::config::ClipboardConfig;
use crate::dom;
use crate::error::{EffectError, Result};

async fn write_text(window: &Window, text: &str) -> Result<()> {
    let navigator = window.navigator();
    // Absent outside secure contexts
    let available = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .map(|value| !value.is_undefined())
        .unwrap_or(false);
    if !available {
        return Err(EffectError::Unsupported("clipboard"));
    }
    let promise = navigator.clipboard().write_text(text);
    JsFuture::from(promise).await?;
    Ok(())
}

pub fn mount(window: &Window, document: &Document, config: &ClipboardConfig) -> Result<()> {
    let sources = dom::query_all::<HtmlElement>(document, &config.selector);
    debug!("copy sources: {}", sources.len());

    for source in sources {
        let window = window.clone();
        let config = config.clone();
        let target = source.clone();
        dom::listen(&source, "click", move |event| {
            event.prevent_default();
            let Some(text) = target.get_attribute(&config.attribute) else {
                return;
            };
            let window = window.clone();
            let success = config.success_message.clone();
            let failure = config.failure_message.clone();
            spawn_local(async move {
                match write_text(&window, &text).await {
                    Ok(()) => notification::show(success, Severity::Info),
                    Err(e) => {
                        warn!("clipboard write failed: {}", e);
                        notification::show(failure, Severity::Error);
                    }
                }
            });
        })?;
    }
    Ok(())
}
