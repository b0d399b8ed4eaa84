//! Deterministic RNG streams segregated by game domain.
//!
//! Keeper wander and shot resolution draw from independent streams derived
//! from one user-visible seed, so replaying a seed reproduces a session
//! even when the number of keeper ticks between kicks varies.
use std::cell::{RefCell, RefMut};

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// Deterministic bundle of RNG streams segregated by game domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    keeper: RefCell<CountingRng<SmallRng>>,
    resolve: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let keeper = CountingRng::new(derive_stream_seed(seed, b"keeper"));
        let resolve = CountingRng::new(derive_stream_seed(seed, b"resolve"));
        Self {
            keeper: RefCell::new(keeper),
            resolve: RefCell::new(resolve),
        }
    }

    /// Access the keeper-motion RNG stream.
    #[must_use]
    pub fn keeper(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.keeper.borrow_mut()
    }

    /// Access the shot-resolution RNG stream.
    #[must_use]
    pub fn resolve(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.resolve.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
