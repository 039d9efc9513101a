// Renderer that owns the full screen background canvas and its 2d context.
// Drawing goes through the `Surface` trait so a frame can be recorded in tests
// without a browser.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::SiteError;
use crate::input::Viewport;

pub trait Surface {
    fn clear(&self, viewport: Viewport);
    fn fill_glowing_circle(
        &self,
        center: [f64; 2],
        radius: f64,
        color: &str,
        glow: f64,
    ) -> Result<(), JsValue>;
}

pub struct Renderer {
    pub canvas: HtmlCanvasElement,
    pub context: CanvasRenderingContext2d,
}

impl Renderer {
    const CANVAS_STYLE: [(&'static str, &'static str); 7] = [
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("pointer-events", "none"),
        ("z-index", "-1"),
    ];

    // Creates the canvas, pins it behind the page and grabs its 2d context
    pub fn attach(document: &Document, viewport: Viewport) -> Result<Renderer, SiteError> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SiteError::Js("created element is not a canvas".into()))?;

        let style = canvas.style();
        for (property, value) in Renderer::CANVAS_STYLE.iter() {
            style.set_property(property, value)?;
        }

        let body = document.body().ok_or_else(|| SiteError::missing("body"))?;
        body.append_child(&canvas)?;

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| SiteError::Js("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SiteError::Js("context is not a 2d context".into()))?;

        let renderer = Renderer { canvas, context };
        renderer.resize(viewport);
        Ok(renderer)
    }

    pub fn resize(&self, viewport: Viewport) {
        self.canvas.set_width(viewport.width.max(0.0) as u32);
        self.canvas.set_height(viewport.height.max(0.0) as u32);
    }
}

impl Surface for Renderer {
    fn clear(&self, viewport: Viewport) {
        self.context
            .clear_rect(0.0, 0.0, viewport.width, viewport.height);
    }

    // Plain fill first, then the same path again with a shadow for the glow
    #[allow(deprecated)]
    fn fill_glowing_circle(
        &self,
        center: [f64; 2],
        radius: f64,
        color: &str,
        glow: f64,
    ) -> Result<(), JsValue> {
        let ctx = &self.context;
        ctx.begin_path();
        ctx.arc(center[0], center[1], radius, 0.0, std::f64::consts::PI * 2.0)?;
        ctx.set_fill_style(&JsValue::from_str(color));
        ctx.fill();

        ctx.set_shadow_blur(glow);
        ctx.set_shadow_color(color);
        ctx.fill();
        ctx.set_shadow_blur(0.0);
        Ok(())
    }
}
