// Reveal-on-scroll. Candidates start hidden and are revealed either when a
// scroll puts their top within the offset of the viewport bottom, or when the
// intersection observer sees them. Revealing marks the element, so whichever
// trigger comes second is a no-op.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::config::SiteConfig;
use crate::dom::{self, ObserverOptions};
use crate::error::SiteError;

pub const REVEALED_ATTR: &str = "data-revealed";

const HIDDEN_STYLE: [(&str, &str); 3] = [
    ("opacity", "0"),
    ("transform", "translateY(30px)"),
    ("transition", "opacity 0.6s ease, transform 0.6s ease"),
];
const VISIBLE_STYLE: [(&str, &str); 2] = [("opacity", "1"), ("transform", "translateY(0)")];

pub fn should_reveal(element_top: f64, viewport_height: f64, offset: f64) -> bool {
    element_top < viewport_height - offset
}

pub fn prepare(el: &HtmlElement) -> Result<(), SiteError> {
    for (property, value) in HIDDEN_STYLE.iter() {
        dom::set_style(el, property, value)?;
    }
    Ok(())
}

/// Applies the visible state once. Returns false when it was already revealed.
pub fn reveal(el: &HtmlElement) -> Result<bool, SiteError> {
    if el.has_attribute(REVEALED_ATTR) {
        return Ok(false);
    }
    for (property, value) in VISIBLE_STYLE.iter() {
        dom::set_style(el, property, value)?;
    }
    el.set_attribute(REVEALED_ATTR, "")?;
    Ok(true)
}

struct ScrollReveal {
    window: Window,
    candidates: Vec<HtmlElement>,
    offset: f64,
}

impl ScrollReveal {
    fn check(&self) -> Result<(), SiteError> {
        let viewport_height = self.window.inner_height()?.as_f64().unwrap_or(0.0);
        for el in &self.candidates {
            let top = el.get_bounding_client_rect().top();
            if should_reveal(top, viewport_height, self.offset) {
                reveal(el)?;
            }
        }
        Ok(())
    }
}

pub fn install(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let selectors = &config.selectors;
    let settings = &config.reveal;

    let candidates = dom::query_all(document, selectors.scroll_reveal)?;
    for el in &candidates {
        prepare(el)?;
    }

    let scroll = Rc::new(ScrollReveal {
        window: window.clone(),
        candidates,
        offset: settings.scroll_offset,
    });
    dom::listen(window, "scroll", move |_| {
        if let Err(err) = scroll.check() {
            log::warn!("scroll reveal: {}", err);
        }
    })?;

    let observed = dom::query_all(document, selectors.observed_reveal)?;
    dom::observe_visibility(
        &observed,
        ObserverOptions {
            threshold: settings.threshold,
            root_margin: settings.root_margin,
        },
        |target, _| {
            if let Some(el) = target.dyn_ref::<HtmlElement>() {
                if let Err(err) = reveal(el) {
                    log::warn!("observed reveal: {}", err);
                }
            }
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_inside_the_offset() {
        assert!(should_reveal(400.0, 800.0, 150.0));
        assert!(should_reveal(-200.0, 800.0, 150.0));
        assert!(!should_reveal(650.0, 800.0, 150.0));
        assert!(!should_reveal(900.0, 800.0, 150.0));
    }
}
