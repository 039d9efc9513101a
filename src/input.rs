// Pointer and viewport state shared between the window listeners (the only
// writers) and the render loop (the only reader). Everything runs on the one
// JS thread so a pair of Rc<Cell<..>> is all the sharing needed.

use std::cell::Cell;
use std::rc::Rc;
use vecmath::Vector2;
use web_sys::Window;

use crate::error::SiteError;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Viewport {
        Viewport { width, height }
    }

    pub fn of_window(window: &Window) -> Result<Viewport, SiteError> {
        let width = window.inner_width()?.as_f64().unwrap_or(0.0);
        let height = window.inner_height()?.as_f64().unwrap_or(0.0);
        Ok(Viewport::new(width, height))
    }

    pub fn contains(&self, pos: Vector2<f64>) -> bool {
        pos[0] >= 0.0 && pos[0] < self.width && pos[1] >= 0.0 && pos[1] < self.height
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Pointer {
        Pointer { x, y }
    }

    pub fn position(&self) -> Vector2<f64> {
        [self.x, self.y]
    }
}

#[derive(Clone, Default)]
pub struct SharedInput {
    viewport: Rc<Cell<Viewport>>,
    pointer: Rc<Cell<Pointer>>,
}

impl SharedInput {
    pub fn new(viewport: Viewport) -> SharedInput {
        SharedInput {
            viewport: Rc::new(Cell::new(viewport)),
            pointer: Rc::new(Cell::new(Pointer::default())),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer.get()
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    pub fn set_pointer(&self, pointer: Pointer) {
        self.pointer.set(pointer);
    }
}
