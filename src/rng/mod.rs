//! Deterministic seeded RNG for world generation.
//!
//! Everything layout-related (biome grid, flower scatter, obstacle
//! placement, river shape) draws from `DayRng` so the same date string
//! reproduces the same world on every platform. Ambience that is allowed
//! to differ between runs (particle spawns, cloud drift) uses the `rand`
//! crate instead and must never touch this.
//!
//! Low quality is fine here; reproducibility is the contract. The seed
//! hash is explicit FNV-1a — never a language-default string hash — and
//! the step is a plain 32-bit LCG.

/// Fast reproducible generator. `new` with the same string always yields
/// the same stream.
#[derive(Debug, Clone)]
pub struct DayRng {
    state: u32,
}

/// FNV-1a, 32-bit. Fixed constants, byte-wise over the UTF-8 string.
pub fn fnv1a(seed: &str) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for b in seed.bytes() {
        hash ^= b as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

impl DayRng {
    pub fn new(seed: &str) -> Self {
        let mut hash = fnv1a(seed);
        // A zero state would collapse the first few outputs.
        if hash == 0 {
            hash = 0x9e37_79b9;
        }
        Self { state: hash }
    }

    /// Derive a sub-stream, e.g. `seed` scoped to one screen.
    pub fn for_scope(seed: &str, scope: &str) -> Self {
        Self::new(&format!("{seed}:{scope}"))
    }

    /// Next float in [0, 1).
    pub fn next(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        // Use the high 24 bits; the low bits of an LCG cycle fast.
        (self.state >> 8) as f32 / (1u32 << 24) as f32
    }

    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next() * (max - min)
    }

    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(max >= min);
        min + (self.next() * (max - min + 1) as f32) as i32
    }

    /// Panics on an empty slice; that is a programmer error, not a state.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "choice on empty slice");
        let idx = (self.next() * items.len() as f32) as usize;
        &items[idx.min(items.len() - 1)]
    }

    /// Fisher–Yates, driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next() * (i + 1) as f32) as usize;
            items.swap(i, j.min(i));
        }
    }
}
