// requestAnimationFrame driven loops. `AnimationLoop` re-arms its callback
// after every tick until the tick reports it is done or `stop` is called.
// The background particle effect is one such loop that never finishes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::Rng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, MouseEvent, Window};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;
use crate::input::{Pointer, SharedInput, Viewport};
use crate::particle::Attraction;
use crate::renderer::{Renderer, Surface};
use crate::store::ParticleStore;
use crate::Timer;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Continue,
    Done,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct AnimationLoop {
    window: Window,
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
    /// Schedules `tick` on the next frame. It receives the frame timestamp in
    /// milliseconds and is re-armed for as long as it returns `Frame::Continue`.
    pub fn start<F>(window: &Window, mut tick: F) -> Result<AnimationLoop, SiteError>
    where
        F: FnMut(f64) -> Frame + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let rearm = callback.clone();
        let rearm_pending = pending.clone();
        let frame_window = window.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            rearm_pending.set(None);
            if tick(timestamp) == Frame::Done {
                release_later(rearm.clone());
                return;
            }
            if let Some(next) = rearm.borrow().as_ref() {
                match frame_window.request_animation_frame(next.as_ref().unchecked_ref()) {
                    Ok(handle) => rearm_pending.set(Some(handle)),
                    Err(err) => log::error!("could not request animation frame: {:?}", err),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let handle = match callback.borrow().as_ref() {
            Some(first) => window.request_animation_frame(first.as_ref().unchecked_ref())?,
            None => return Err(SiteError::Js("animation callback missing".into())),
        };
        pending.set(Some(handle));

        Ok(AnimationLoop {
            window: window.clone(),
            callback,
            pending,
        })
    }

    pub fn is_running(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Cancels the pending frame and drops the callback. Must be called from
    /// outside the loop's own tick; a tick ends its loop by returning `Frame::Done`.
    pub fn stop(&self) {
        if let Some(handle) = self.pending.take() {
            if let Err(err) = self.window.cancel_animation_frame(handle) {
                log::warn!("could not cancel animation frame: {:?}", err);
            }
        }
        self.callback.borrow_mut().take();
    }
}

// The callback cannot drop itself while it is running, so the final release
// is pushed to a microtask.
fn release_later(callback: FrameCallback) {
    wasm_bindgen_futures::spawn_local(async move {
        callback.borrow_mut().take();
    });
}

pub struct FrameSettings {
    pub attraction: Attraction,
    pub glow: f64,
}

/// One pass of the background effect: clear, then step, draw and recycle
/// every particle in order. Returns how many particles were replaced.
pub fn render_frame<S, R>(
    store: &mut ParticleStore,
    surface: &S,
    pointer: Pointer,
    viewport: Viewport,
    settings: &FrameSettings,
    rng: &mut R,
) -> usize
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    surface.clear(viewport);
    store.update(pointer, viewport, &settings.attraction, rng, |particle| {
        let color = particle.color.to_css();
        if let Err(err) = surface.fill_glowing_circle(particle.pos, particle.radius, &color, settings.glow) {
            log::warn!("failed to draw particle: {:?}", err);
        }
    })
}

/// Creates the background canvas, seeds the particles and starts the loop.
/// Resize and mouse move listeners keep the shared input current.
pub fn start_background(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
) -> Result<AnimationLoop, SiteError> {
    let input = SharedInput::new(Viewport::of_window(window)?);
    let renderer = Rc::new(Renderer::attach(document, input.viewport())?);

    let mut store = ParticleStore::new();
    store.initialize(config.particle_count, input.viewport(), &mut rand::thread_rng());
    log::info!("background started with {} particles", store.len());

    {
        let input = input.clone();
        let renderer = renderer.clone();
        let resize_window = window.clone();
        dom::listen(window, "resize", move |_| match Viewport::of_window(&resize_window) {
            Ok(viewport) => {
                input.set_viewport(viewport);
                renderer.resize(viewport);
            }
            Err(err) => log::warn!("resize ignored: {}", err),
        })?;
    }
    {
        let input = input.clone();
        dom::listen(window, "mousemove", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                input.set_pointer(Pointer::new(mouse.client_x() as f64, mouse.client_y() as f64));
            }
        })?;
    }

    let settings = FrameSettings {
        attraction: config.attraction,
        glow: config.glow_blur,
    };
    let debug_timing = config.debug_timing;
    let mut rng = rand::thread_rng();
    AnimationLoop::start(window, move |_| {
        let _timer = if debug_timing {
            Some(Timer::new("background frame"))
        } else {
            None
        };
        render_frame(
            &mut store,
            renderer.as_ref(),
            input.pointer(),
            input.viewport(),
            &settings,
            &mut rng,
        );
        Frame::Continue
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Recorder {
        clears: Cell<usize>,
        circles: RefCell<Vec<([f64; 2], f64, String, f64)>>,
    }

    impl Surface for Recorder {
        fn clear(&self, _viewport: Viewport) {
            self.clears.set(self.clears.get() + 1);
        }

        fn fill_glowing_circle(
            &self,
            center: [f64; 2],
            radius: f64,
            color: &str,
            glow: f64,
        ) -> Result<(), JsValue> {
            self.circles
                .borrow_mut()
                .push((center, radius, color.to_owned(), glow));
            Ok(())
        }
    }

    fn settings() -> FrameSettings {
        FrameSettings {
            attraction: Attraction::default(),
            glow: 10.0,
        }
    }

    #[test]
    fn frame_clears_once_and_draws_every_particle() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut store = ParticleStore::new();
        store.initialize(50, viewport, &mut rng);
        let surface = Recorder::default();

        render_frame(&mut store, &surface, Pointer::new(150.0, 100.0), viewport, &settings(), &mut rng);

        assert_eq!(surface.clears.get(), 1);
        let circles = surface.circles.borrow();
        assert_eq!(circles.len(), 50);
        for (center, radius, color, glow) in circles.iter() {
            assert!(viewport.contains(*center));
            assert!(*radius >= 1.0 && *radius < 3.0);
            assert!(color.starts_with("hsl("));
            assert_eq!(*glow, 10.0);
        }
    }

    #[test]
    fn drawn_positions_match_the_store() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut rng = StdRng::seed_from_u64(12);
        let mut store = ParticleStore::new();
        store.initialize(5, viewport, &mut rng);
        let surface = Recorder::default();

        let replaced = render_frame(&mut store, &surface, Pointer::default(), viewport, &settings(), &mut rng);

        assert_eq!(replaced, 0);
        let drawn: Vec<[f64; 2]> = surface.circles.borrow().iter().map(|c| c.0).collect();
        let stored: Vec<[f64; 2]> = store.iter().map(|p| p.pos).collect();
        assert_eq!(drawn, stored);
    }
}
