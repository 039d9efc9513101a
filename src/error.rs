// Crate wide error type. Everything that talks to the browser funnels
// JsValue failures through here so `?` works across web-sys calls.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no global window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid email address")]
    InvalidEmail,
    #[error("request failed with status {0}")]
    Http(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0}ms")]
    Timeout(u32),
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SiteError {
    pub fn missing(selector: &str) -> SiteError {
        SiteError::MissingElement(selector.to_owned())
    }
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Js(describe(&value))
    }
}

impl From<SiteError> for JsValue {
    fn from(err: SiteError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

// Best effort text for a thrown JS value (Error objects, strings, anything else)
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}
