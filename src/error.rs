use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why an effect could not be wired up. These never reach the user: the
/// caller logs them and the page keeps working without that sub-effect.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing element: {0}")]
    MissingElement(&'static str),
    #[error("highlight is not an SVG geometry element")]
    NotAPath,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for EffectError {
    fn from(value: JsValue) -> Self {
        EffectError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

pub type EffectResult<T> = Result<T, EffectError>;
