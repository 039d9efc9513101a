//! Test suite for the Web and headless browsers.

#![cfg(target_arch = "wasm32")]

extern crate wasm_bindgen_test;
use std::cell::Cell;
use std::rc::Rc;

use eastern_lights_site::animation::{render_frame, AnimationLoop, Frame, FrameSettings};
use eastern_lights_site::config::{HeroMotion, Selectors, SiteConfig};
use eastern_lights_site::contact::DomFormView;
use eastern_lights_site::counter::{self, CounterTiming};
use eastern_lights_site::dom::{self, Timeout};
use eastern_lights_site::form::FormView;
use eastern_lights_site::input::{Pointer, Viewport};
use eastern_lights_site::navigation::{self, MENU_OPEN_CLASS, MENU_TOGGLE_CLASS};
use eastern_lights_site::particle::Attraction;
use eastern_lights_site::renderer::Renderer;
use eastern_lights_site::reveal;
use eastern_lights_site::scroll::{HeaderStyle, HeroStyle};
use eastern_lights_site::store::ParticleStore;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn div() -> HtmlElement {
    let document = dom::document(&dom::window().unwrap()).unwrap();
    let el = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    document.body().unwrap().append_child(&el).unwrap();
    el
}

fn page() -> Document {
    dom::document(&dom::window().unwrap()).unwrap()
}

fn fixture(html: &str) -> HtmlElement {
    let el = div();
    el.set_inner_html(html);
    el
}

fn style(el: &HtmlElement, property: &str) -> String {
    el.style().get_property_value(property).unwrap()
}

fn config_with(selectors: Selectors) -> SiteConfig {
    SiteConfig {
        selectors,
        ..SiteConfig::default()
    }
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        dom::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn renderer_sizes_canvas_to_viewport() {
    let document = dom::document(&dom::window().unwrap()).unwrap();
    let renderer = Renderer::attach(&document, Viewport::new(320.0, 200.0)).unwrap();
    assert_eq!(renderer.canvas.width(), 320);
    assert_eq!(renderer.canvas.height(), 200);
    assert_eq!(
        renderer.canvas.style().get_property_value("pointer-events").unwrap(),
        "none"
    );

    renderer.resize(Viewport::new(640.0, 480.0));
    assert_eq!(renderer.canvas.width(), 640);
    assert_eq!(renderer.canvas.height(), 480);
}

#[wasm_bindgen_test]
fn frame_draws_onto_canvas() {
    let document = dom::document(&dom::window().unwrap()).unwrap();
    let viewport = Viewport::new(120.0, 80.0);
    let renderer = Renderer::attach(&document, viewport).unwrap();
    let mut store = ParticleStore::new();
    store.initialize(50, viewport, &mut rand::thread_rng());
    let settings = FrameSettings {
        attraction: Attraction::default(),
        glow: 10.0,
    };

    render_frame(
        &mut store,
        &renderer,
        Pointer::new(60.0, 40.0),
        viewport,
        &settings,
        &mut rand::thread_rng(),
    );
    assert_eq!(store.len(), 50);
    assert_eq!(renderer.context.shadow_blur(), 0.0);
}

#[wasm_bindgen_test]
fn reveal_applies_once() {
    let el = div();
    reveal::prepare(&el).unwrap();
    assert_eq!(el.style().get_property_value("opacity").unwrap(), "0");

    assert!(reveal::reveal(&el).unwrap());
    assert_eq!(el.style().get_property_value("opacity").unwrap(), "1");
    assert!(el.has_attribute(reveal::REVEALED_ATTR));

    assert!(!reveal::reveal(&el).unwrap());
}

#[wasm_bindgen_test]
fn animation_loop_can_be_stopped() {
    let window = dom::window().unwrap();
    let looped = AnimationLoop::start(&window, |_| Frame::Continue).unwrap();
    assert!(looped.is_running());
    looped.stop();
    assert!(!looped.is_running());
}

#[wasm_bindgen_test]
fn header_style_follows_scroll() {
    let header = div();
    HeaderStyle::for_scroll(150.0, 100.0).apply(&header).unwrap();
    assert_eq!(style(&header, "background-color"), "rgba(255, 255, 255, 0.98)");
    assert_eq!(style(&header, "border-bottom-width"), "1px");

    HeaderStyle::for_scroll(20.0, 100.0).apply(&header).unwrap();
    assert_eq!(style(&header, "background-color"), "rgba(255, 255, 255, 0.95)");
}

#[wasm_bindgen_test]
fn hero_fades_and_moves_with_scroll() {
    let hero = div();
    let motion = HeroMotion {
        fade_distance: 500.0,
        parallax: 0.5,
    };
    HeroStyle::for_scroll(200.0, &motion).apply(&hero).unwrap();
    assert_eq!(style(&hero, "opacity"), "0.6");
    assert_eq!(style(&hero, "transform"), "translateY(100px)");

    HeroStyle::for_scroll(800.0, &motion).apply(&hero).unwrap();
    assert_eq!(style(&hero, "opacity"), "0");
    assert_eq!(style(&hero, "transform"), "translateY(400px)");
}

#[wasm_bindgen_test]
fn mobile_menu_button_toggles_menu() {
    let root = fixture(r#"<div class="menu-test-nav"><ul class="menu-test-list"></ul></div>"#);
    let config = config_with(Selectors {
        nav_container: ".menu-test-nav",
        nav_menu: ".menu-test-list",
        ..Selectors::default()
    });
    navigation::install_mobile_menu(&page(), &config).unwrap();

    let toggle = root
        .query_selector(&format!(".menu-test-nav .{}", MENU_TOGGLE_CLASS))
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    assert_eq!(toggle.inner_html(), "☰");
    assert_eq!(style(&toggle, "display"), "none");

    let menu = root.query_selector(".menu-test-list").unwrap().unwrap();
    assert!(!menu.class_list().contains(MENU_OPEN_CLASS));
    toggle.click();
    assert!(menu.class_list().contains(MENU_OPEN_CLASS));
    toggle.click();
    assert!(!menu.class_list().contains(MENU_OPEN_CLASS));
}

#[wasm_bindgen_test]
fn anchor_clicks_never_navigate() {
    let root = fixture(
        r##"<a class="smooth-test" href="#smooth-target">here</a>
            <a class="smooth-test" href="#nowhere">gone</a>
            <a class="smooth-test" href="#">top</a>
            <div id="smooth-target"></div>"##,
    );
    let config = config_with(Selectors {
        anchors: "a.smooth-test",
        ..Selectors::default()
    });
    navigation::install_smooth_anchors(&page(), &config).unwrap();

    let prevented = Rc::new(Cell::new(0));
    let seen = prevented.clone();
    dom::listen(&root, "click", move |event| {
        if event.default_prevented() {
            seen.set(seen.get() + 1);
        }
    })
    .unwrap();

    let hash = dom::window().unwrap().location().hash().unwrap();
    for anchor in dom::query_all(&page(), "a.smooth-test").unwrap() {
        anchor.click();
    }
    assert_eq!(prevented.get(), 3);
    assert_eq!(dom::window().unwrap().location().hash().unwrap(), hash);
}

#[wasm_bindgen_test]
async fn finished_counter_flashes_then_rests() {
    let window = dom::window().unwrap();
    let counter = div();
    counter::highlight(&window, &counter, 20).unwrap();
    assert!(counter.class_list().contains("animated"));
    let flash = style(&counter, "text-shadow");
    assert!(flash.contains("30px"), "{}", flash);
    assert!(flash.contains("0.8"), "{}", flash);

    sleep(100).await;
    let rest = style(&counter, "text-shadow");
    assert!(rest.contains("20px"), "{}", rest);
    assert!(rest.contains("0.3"), "{}", rest);
}

#[wasm_bindgen_test]
async fn counters_run_once_when_grid_shows() {
    let grid = fixture(
        r#"<div class="counter-test-grid" style="position: fixed; top: 0; left: 0; width: 100px; height: 100px">
             <span data-count="10+"></span>
           </div>"#,
    );
    let config = SiteConfig {
        counter: CounterTiming {
            duration_ms: 30.0,
            stagger_ms: 0.0,
        },
        highlight_fade_ms: 10,
        ..config_with(Selectors {
            stats_grid: ".counter-test-grid",
            counters: ".counter-test-grid [data-count]",
            ..Selectors::default()
        })
    };
    counter::install(&dom::window().unwrap(), &page(), &config).unwrap();

    sleep(500).await;
    let count = grid
        .query_selector("[data-count]")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    assert_eq!(count.text_content().unwrap(), "10");
    assert!(count.class_list().contains("animated"));

    // reattaching makes the grid intersect again; an unobserved grid stays quiet
    count.set_text_content(Some("idle"));
    let body = page().body().unwrap();
    body.remove_child(&grid).unwrap();
    sleep(100).await;
    body.append_child(&grid).unwrap();
    sleep(500).await;
    assert_eq!(count.text_content().unwrap(), "idle");
}

#[wasm_bindgen_test]
async fn success_message_shows_then_hides() {
    let form = fixture(
        r#"<input class="email-input" value="a@b.co">
           <button class="submit-btn">Notify me</button>
           <div class="success-test" style="display: none">Thanks</div>"#,
    );
    let selectors = Selectors {
        success_message: ".success-test",
        ..Selectors::default()
    };
    let window = dom::window().unwrap();
    let view = DomFormView::new(&window, &page(), &form, &selectors).unwrap();
    let message = form
        .query_selector(".success-test")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();

    assert_eq!(view.email(), "a@b.co");
    view.clear_email();
    assert_eq!(view.email(), "");

    view.show_success();
    assert_eq!(style(&message, "display"), "block");
    view.hide_success_after(SiteConfig::default().form.success_hide_ms);
    sleep(2500).await;
    assert_eq!(style(&message, "display"), "block");
    sleep(800).await;
    assert_eq!(style(&message, "display"), "none");
}

#[wasm_bindgen_test]
fn submit_button_reflects_busy_state() {
    let form = fixture(
        r#"<input class="email-input"><button class="submit-btn">Notify me</button>"#,
    );
    let view = DomFormView::new(
        &dom::window().unwrap(),
        &page(),
        &form,
        &Selectors::default(),
    )
    .unwrap();
    let button = form
        .query_selector(".submit-btn")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlButtonElement>()
        .unwrap();

    view.set_submit(false, "Submitting...");
    assert!(button.disabled());
    assert_eq!(button.text_content().unwrap(), "Submitting...");
    view.set_submit(true, "Notify me");
    assert!(!button.disabled());
}

#[wasm_bindgen_test]
async fn cancelled_timeout_never_fires() {
    let window = dom::window().unwrap();
    let fired = Rc::new(Cell::new(false));

    let flag = fired.clone();
    let timeout = Timeout::schedule(&window, 20, move || flag.set(true)).unwrap();
    timeout.cancel();
    sleep(80).await;
    assert!(!fired.get());

    let flag = fired.clone();
    let timeout = Timeout::schedule(&window, 20, move || flag.set(true)).unwrap();
    sleep(80).await;
    assert!(fired.get());
    timeout.cancel();
}
