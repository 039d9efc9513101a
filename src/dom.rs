// Thin helpers over web-sys for the things every component does: finding
// elements, poking inline styles, and hanging Rust closures off browser events.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use crate::error::SiteError;

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

pub fn document(window: &Window) -> Result<Document, SiteError> {
    window.document().ok_or(SiteError::NoDocument)
}

pub fn query(document: &Document, selector: &str) -> Result<Option<HtmlElement>, SiteError> {
    Ok(document
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok()))
}

pub fn require(document: &Document, selector: &str) -> Result<HtmlElement, SiteError> {
    query(document, selector)?.ok_or_else(|| SiteError::missing(selector))
}

pub fn require_as<T: JsCast>(root: &Element, selector: &str) -> Result<T, SiteError> {
    root.query_selector(selector)?
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| SiteError::missing(selector))
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, SiteError> {
    let list = document.query_selector_all(selector)?;
    let mut elements = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|node| node.dyn_into::<HtmlElement>().ok()) {
            elements.push(el);
        }
    }
    Ok(elements)
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) -> Result<(), SiteError> {
    el.style().set_property(property, value)?;
    Ok(())
}

/// Registers `handler` for `event` on `target` for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), SiteError>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Runs `callback` once after `delay_ms`. The closure frees itself when it
/// runs, so only use this for timeouts that are never cleared; see `Timeout`.
pub fn set_timeout<F>(window: &Window, delay_ms: u32, callback: F) -> Result<i32, SiteError>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(callback);
    let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms as i32,
    )?;
    Ok(handle)
}

/// A pending `setTimeout` that owns its callback. Cancelling (or dropping)
/// clears the browser timer and frees the closure with it.
pub struct Timeout {
    window: Window,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn schedule<F>(window: &Window, delay_ms: u32, callback: F) -> Result<Timeout, SiteError>
    where
        F: FnOnce() + 'static,
    {
        let callback = Closure::once(callback);
        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms as i32,
        )?;
        Ok(Timeout {
            window: window.clone(),
            handle,
            _callback: callback,
        })
    }

    pub fn cancel(self) {
        drop(self)
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        // clearing a timer that already fired is a no-op
        self.window.clear_timeout_with_handle(self.handle);
    }
}

pub struct ObserverOptions<'a> {
    pub threshold: f64,
    pub root_margin: &'a str,
}

/// Watches `elements` and calls `on_visible` for each entry that starts
/// intersecting. The handler also gets the observer so it can unobserve.
pub fn observe_visibility<F>(
    elements: &[HtmlElement],
    options: ObserverOptions,
    mut on_visible: F,
) -> Result<IntersectionObserver, SiteError>
where
    F: FnMut(&Element, &IntersectionObserver) + 'static,
{
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            if entry.is_intersecting() {
                on_visible(&entry.target(), &observer);
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(options.root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    for el in elements {
        observer.observe(el);
    }
    Ok(observer)
}
