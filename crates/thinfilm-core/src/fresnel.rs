//! Normal-incidence Fresnel relations for lossless media.

/// Amplitude reflection coefficient at an interface from index `n_a` into `n_b`.
///
/// $r = \frac{n_a - n_b}{n_a + n_b}$
///
/// Callers validate both indices as positive beforehand, so the sum never
/// vanishes.
pub fn amplitude_coefficient(n_a: f64, n_b: f64) -> f64 {
    (n_a - n_b) / (n_a + n_b)
}

/// Power reflectance (%) of a single bare interface.
pub fn interface_reflectance(n_a: f64, n_b: f64) -> f64 {
    let r = amplitude_coefficient(n_a, n_b);
    r * r * 100.0
}

/// Reflectance (%) of an uncoated substrate in air.
///
/// $R_0 = \left(\frac{n_s - 1}{n_s + 1}\right)^2 \times 100$
pub fn uncoated_reflectance(n_substrate: f64) -> f64 {
    interface_reflectance(1.0, n_substrate)
}

/// Film index that zeroes a single quarter-wave layer's reflectance: $\sqrt{n_0 n_s}$.
pub fn ideal_antireflection_index(n_incident: f64, n_substrate: f64) -> f64 {
    (n_incident * n_substrate).sqrt()
}
