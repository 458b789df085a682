use wasm_bindgen::JsValue;

/// Errors raised while wiring effects onto the host page
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("no global window available")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("{0} is not supported by this browser")]
    Unsupported(&'static str),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("invalid effects config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for EffectError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        EffectError::Js(message)
    }
}

pub type Result<T> = std::result::Result<T, EffectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_element_names_selector() {
        let err = EffectError::MissingElement(".navbar".to_string());
        assert_eq!(err.to_string(), "element not found: .navbar");
    }

    #[test]
    fn config_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: EffectError = parse.into();
        assert!(matches!(err, EffectError::Config(_)));
    }
}
