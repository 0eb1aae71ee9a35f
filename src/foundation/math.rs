/// Cubic ease `x²(3 - 2x)` on `[0, 1]`; input is clamped.
///
/// Zero first derivative at both ends, monotonic in between, and exact at the endpoints
/// (`smoothstep(0) == 0`, `smoothstep(1) == 1`).
pub(crate) fn smoothstep(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Raised-cosine taper: `1` at `dist == 0`, `0` at `dist == max_dist`.
pub(crate) fn cosine_taper(dist: f64, max_dist: f64) -> f64 {
    if dist <= 0.0 {
        return 1.0;
    }
    if dist >= max_dist {
        return 0.0;
    }
    (0.5 * (1.0 + (std::f64::consts::PI * dist / max_dist).cos())).clamp(0.0, 1.0)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}
