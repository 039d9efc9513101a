// Smooth scrolling for in-page anchors and the mobile menu toggle.

use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;

pub const MENU_TOGGLE_CLASS: &str = "mobile-menu-toggle";
pub const MENU_OPEN_CLASS: &str = "mobile-open";

pub fn install_smooth_anchors(document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    for anchor in dom::query_all(document, config.selectors.anchors)? {
        let document = document.clone();
        let target_anchor = anchor.clone();
        dom::listen(&anchor, "click", move |event| {
            event.prevent_default();
            let href = match target_anchor.get_attribute("href") {
                Some(href) => href,
                None => return,
            };
            // a bare "#" is not a valid selector; nothing to scroll to
            match document.query_selector(&href) {
                Ok(Some(target)) => scroll_into_view(&target),
                Ok(None) => {}
                Err(_) => log::debug!("anchor {} has no scroll target", href),
            }
        })?;
    }
    Ok(())
}

fn scroll_into_view(target: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Adds the (initially hidden) menu button to the nav container.
pub fn install_mobile_menu(document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let nav = match dom::query(document, config.selectors.nav_container)? {
        Some(nav) => nav,
        None => return Ok(()),
    };

    let toggle = document
        .create_element("button")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| SiteError::Js("created element is not an html element".into()))?;
    toggle.set_class_name(MENU_TOGGLE_CLASS);
    toggle.set_inner_html("☰");
    dom::set_style(&toggle, "display", "none")?;
    nav.append_child(&toggle)?;

    let document = document.clone();
    let menu_selector = config.selectors.nav_menu;
    dom::listen(&toggle, "click", move |_| match dom::query(&document, menu_selector) {
        Ok(Some(menu)) => {
            if let Err(err) = menu.class_list().toggle(MENU_OPEN_CLASS) {
                log::warn!("menu toggle: {:?}", err);
            }
        }
        Ok(None) => {}
        Err(err) => log::warn!("menu toggle: {}", err),
    })
}
