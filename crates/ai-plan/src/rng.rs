/// Random choice used when an `Alternative` branch is reached.
///
/// Not cryptographic. Alternatives only need "uniform among direct children".
pub trait ChoiceRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform index in `0..len`, or `None` for an empty range.
    fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        // Multiply-shift keeps the bias below 2^-64 per draw.
        let wide = (self.next_u64() as u128) * (len as u128);
        Some((wide >> 64) as usize)
    }
}

/// SplitMix64: small seedable generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl ChoiceRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        mix64(self.state)
    }
}

pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Seed for one RNG stream within one cycle.
pub fn derive_seed(global_seed: u64, cycle: u64, stream: u64) -> u64 {
    mix64(global_seed ^ mix64(cycle.wrapping_add(0x9E3779B97F4A7C15)) ^ mix64(stream))
}
