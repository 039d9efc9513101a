// Fixed size collection of live particles. Expired particles are replaced in
// place during the same update pass, so the population never changes.

use crate::input::{Pointer, Viewport};
use crate::particle::{Attraction, Particle};
use rand::Rng;

#[derive(Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> ParticleStore {
        ParticleStore {
            particles: Vec::new(),
        }
    }

    /// Replaces the contents with `count` freshly randomized particles.
    pub fn initialize<R: Rng + ?Sized>(&mut self, count: usize, viewport: Viewport, rng: &mut R) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::random(rng, viewport));
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Steps every particle once. `visit` sees each particle at its updated
    /// position before an expired one is swapped for a new random particle.
    /// Returns how many particles were replaced.
    pub fn update<R, F>(
        &mut self,
        pointer: Pointer,
        viewport: Viewport,
        attraction: &Attraction,
        rng: &mut R,
        mut visit: F,
    ) -> usize
    where
        R: Rng + ?Sized,
        F: FnMut(&Particle),
    {
        let mut replaced = 0;
        for slot in self.particles.iter_mut() {
            let (next, expired) = slot.step(pointer, viewport, attraction);
            visit(&next);
            if expired {
                *slot = Particle::random(rng, viewport);
                replaced += 1;
            } else {
                *slot = next;
            }
        }
        replaced
    }
}
