//! Doppler shift of a satellite transmitter

use crate::constants::C_KM_S;

/// Frequency received from a source receding at `range_rate_km_s`.
///
/// Positive range rates (moving away) lower the frequency.
pub fn observed_frequency(transmitted_hz: f64, range_rate_km_s: f64) -> f64 {
    transmitted_hz * (1.0 - range_rate_km_s / C_KM_S)
}

/// Received minus transmitted frequency in Hz
pub fn doppler_shift(transmitted_hz: f64, range_rate_km_s: f64) -> f64 {
    -transmitted_hz * range_rate_km_s / C_KM_S
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_approaching_satellite_is_blue_shifted() {
        // 2 m amateur band, LEO closing at 7 km/s
        let f = 145.8e6;
        let shift = doppler_shift(f, -7.0);
        assert!(shift > 3_000.0 && shift < 3_500.0);
        assert_relative_eq!(observed_frequency(f, -7.0), f + shift, epsilon = 1e-6);
        assert_eq!(doppler_shift(f, 0.0), 0.0);
        assert!(observed_frequency(f, 5.0) < f);
    }
}
