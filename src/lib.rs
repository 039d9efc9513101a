mod utils;

pub mod animation;
pub mod color;
pub mod config;
pub mod contact;
pub mod counter;
pub mod dom;
pub mod error;
pub mod form;
pub mod input;
pub mod navigation;
pub mod net;
pub mod particle;
pub mod renderer;
pub mod reveal;
pub mod scroll;
pub mod store;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{console, Document, Window};

use animation::AnimationLoop;
use config::SiteConfig;
use error::SiteError;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

thread_local! {
    static BACKGROUND: RefCell<Option<AnimationLoop>> = RefCell::new(None);
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    utils::set_panic_hook();
    console_log::init_with_level(log::Level::Info).ok();

    let window = dom::window()?;
    let document = dom::document(&window)?;
    install(&window, &document, &SiteConfig::default());
    log::info!("Eastern Lights website loaded successfully!");
    Ok(())
}

// Each component is independent; one failing to wire up leaves the others running
fn install(window: &Window, document: &Document, config: &SiteConfig) {
    match animation::start_background(window, document, config) {
        Ok(background) => BACKGROUND.with(|slot| *slot.borrow_mut() = Some(background)),
        Err(err) => log::error!("background: {}", err),
    }

    let components: [(&str, Result<(), SiteError>); 6] = [
        ("anchors", navigation::install_smooth_anchors(document, config)),
        ("scroll", scroll::install(window, document, config)),
        ("reveal", reveal::install(window, document, config)),
        ("mobile menu", navigation::install_mobile_menu(document, config)),
        ("counters", counter::install(window, document, config)),
        ("contact form", contact::install(window, document, config)),
    ];
    for (name, wired) in components.iter() {
        if let Err(err) = wired {
            log::error!("{}: {}", name, err);
        }
    }
}

/// Stops the background animation and releases its frame callback.
#[wasm_bindgen]
pub fn stop_background() {
    BACKGROUND.with(|slot| {
        if let Some(background) = slot.borrow_mut().take() {
            background.stop();
            log::info!("background stopped");
        }
    });
}

#[wasm_bindgen]
pub fn background_running() -> bool {
    BACKGROUND.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(AnimationLoop::is_running)
            .unwrap_or(false)
    })
}
