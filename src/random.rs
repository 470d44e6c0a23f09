//! Random numbers for sub-pixel jitter.
//!
//! Each render worker owns a ChaCha20 generator seeded from the OS, so
//! sampling never contends on shared state.

use rand::{Rng, SeedableRng, rng};
use rand_chacha::ChaCha20Rng;
use std::cell::RefCell;
use glam::Vec2;

thread_local! {
    /// Thread-local ChaCha20 PRNG.
    static RNG: RefCell<ChaCha20Rng> = RefCell::new(ChaCha20Rng::from_rng(&mut rng()));
}

/// Random offset in the [-0.5, 0.5) square around a pixel center.
pub fn random_in_pixel() -> Vec2 {
    RNG.with(|rng| {
        let mut rng = rng.borrow_mut();
        Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5)
    })
}
