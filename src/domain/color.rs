/// Random number generator (xorshift32)
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

fn random_range(state: &mut u32, min: f32, max: f32) -> f32 {
    let unit = xorshift32(state) as f32 / u32::MAX as f32;
    unit * (max - min) + min
}

/// Random saturated color for demo elements, e.g. `hsl(211.42 75% 48.10%)`.
///
/// `state` must be non-zero.
pub fn random_hsl(state: &mut u32) -> String {
    let hue = random_range(state, 0.0, 360.0);
    let lightness = random_range(state, 25.0, 75.0);
    format!("hsl({:.2} 75% {:.2}%)", hue, lightness)
}
