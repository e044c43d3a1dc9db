/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to_decimals(v: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (v * scale).round() / scale
}

/// True for finite, strictly positive values.
pub fn is_positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
