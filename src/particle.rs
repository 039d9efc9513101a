// Background particle: position, velocity, size, color and a frame based life span.
// `step` is the per-frame physics: Euler integration, pointer attraction,
// edge wrapping and aging.

use crate::color::Color;
use crate::input::{Pointer, Viewport};
use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Attraction {
    pub radius: f64,
    pub strength: f64,
}

impl Default for Attraction {
    fn default() -> Self {
        Attraction {
            radius: 100.0,
            strength: 0.01,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub color: Color,
    pub life: i32,
}

impl Particle {
    const MAX_SPEED: f64 = 0.5;
    const MIN_RADIUS: f64 = 1.0;
    const RADIUS_SPREAD: f64 = 2.0;
    const MIN_LIFE: f64 = 100.0;
    const LIFE_SPREAD: f64 = 100.0;
    // Keeps a particle wrapped past the low edge strictly inside the viewport
    const EDGE_INSET: f64 = 1e-6;

    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64, color: Color, life: i32) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            color,
            life,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Particle {
        let pos = [
            rng.gen::<f64>() * viewport.width,
            rng.gen::<f64>() * viewport.height,
        ];
        let vel = [
            (rng.gen::<f64>() - 0.5) * Particle::MAX_SPEED,
            (rng.gen::<f64>() - 0.5) * Particle::MAX_SPEED,
        ];
        let radius = rng.gen::<f64>() * Particle::RADIUS_SPREAD + Particle::MIN_RADIUS;
        let color = Color::in_band(rng.gen::<f64>());
        let life = (rng.gen::<f64>() * Particle::LIFE_SPREAD + Particle::MIN_LIFE) as i32;
        // random() can land exactly on the far edge after scaling
        let pos = [
            wrap_axis(pos[0], viewport.width),
            wrap_axis(pos[1], viewport.height),
        ];
        Particle::new(pos, vel, radius, color, life)
    }

    /// Advances the particle by one frame. Returns the next state and whether
    /// its life ran out on this frame.
    pub fn step(mut self, pointer: Pointer, viewport: Viewport, attraction: &Attraction) -> (Particle, bool) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);

        let to_pointer = vecmath::vec2_sub(pointer.position(), self.pos);
        let distance = vecmath::vec2_len(to_pointer);
        if distance < attraction.radius && distance > f64::EPSILON {
            let force = (attraction.radius - distance) / attraction.radius;
            let direction = vecmath::vec2_scale(to_pointer, 1.0 / distance);
            self.vel = vecmath::vec2_add(
                self.vel,
                vecmath::vec2_scale(direction, force * attraction.strength),
            );
        }

        self.pos = [
            wrap_axis(self.pos[0], viewport.width),
            wrap_axis(self.pos[1], viewport.height),
        ];

        self.life -= 1;
        (self, self.life <= 0)
    }
}

// Teleport wrap into [0, extent): past the low edge jumps to the far edge and
// at or past the far edge jumps to zero.
fn wrap_axis(value: f64, extent: f64) -> f64 {
    if extent <= 0.0 || value >= extent {
        0.0
    } else if value < 0.0 {
        (extent - Particle::EDGE_INSET).max(0.0)
    } else {
        value
    }
}
