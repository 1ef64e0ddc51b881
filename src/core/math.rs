// Math utilities and helper functions

use std::f32::consts::PI;

/// Tolerance used when comparing simulation quantities
pub const EPSILON: f32 = 0.001;

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Frame-rate independent smoothing factor.
///
/// `smoothing` is the fraction of the gap left after one second, so 0.0 snaps
/// immediately and values close to 1.0 respond slowly.
pub fn smoothing_factor(smoothing: f32, dt: f32) -> f32 {
    1.0 - smoothing.clamp(0.0, 1.0).powf(dt.max(0.0))
}

/// Bell-shaped ease curve: 0 at both ends, 1 at the midpoint.
///
/// Input outside [0, 1] is clamped first.
pub fn ease_in_out_bell(t: f32) -> f32 {
    (PI * t.clamp(0.0, 1.0)).sin()
}

/// Sign of a value treating anything inside the dead zone as zero
pub fn sign_outside_dead_zone(value: f32, dead_zone: f32) -> f32 {
    if value > dead_zone {
        1.0
    } else if value < -dead_zone {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_smoothing_zero_snaps() {
        assert_eq!(smoothing_factor(0.0, 1.0 / 60.0), 1.0);
        let f = smoothing_factor(0.05, 1.0 / 60.0);
        assert!(f > 0.0 && f < 1.0);
    }

    #[test]
    fn test_bell_shape() {
        assert!(ease_in_out_bell(0.0).abs() < 1e-6);
        assert!(ease_in_out_bell(1.0).abs() < 1e-6);
        assert!((ease_in_out_bell(0.5) - 1.0).abs() < 1e-6);
        assert!(ease_in_out_bell(0.25) < ease_in_out_bell(0.5));
        // clamped domain
        assert!(ease_in_out_bell(-3.0).abs() < 1e-6);
        assert!(ease_in_out_bell(7.0).abs() < 1e-6);
    }

    #[test]
    fn test_dead_zone_sign() {
        assert_eq!(sign_outside_dead_zone(0.05, 0.1), 0.0);
        assert_eq!(sign_outside_dead_zone(0.5, 0.1), 1.0);
        assert_eq!(sign_outside_dead_zone(-0.5, 0.1), -1.0);
    }
}
