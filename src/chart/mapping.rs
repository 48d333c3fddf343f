/// Clamp `value` into the domain. NaN maps to the lower bound.
fn clamp_to_domain(value: f64, domain_min: f64, domain_max: f64) -> f64 {
    let lo = domain_min.min(domain_max);
    let hi = domain_min.max(domain_max);
    if value.is_nan() {
        return domain_min;
    }
    value.clamp(lo, hi)
}

/// Map a raw measurement from `[domain_min, domain_max]` into
/// `[range_min, range_max]`. Values outside the domain are clamped first.
pub fn map_axis(value: f64, domain_min: f64, domain_max: f64, range_min: f64, range_max: f64) -> f64 {
    let span = domain_max - domain_min;
    if span == 0.0 {
        return range_min;
    }
    let v = clamp_to_domain(value, domain_min, domain_max);
    (v - domain_min) * (range_max - range_min) / span + range_min
}

/// Like [`map_axis`] but reversed: `domain_max` lands on `range_min` and
/// `domain_min` on `range_max`, so larger readings sit toward the far edge of
/// the floor (the top of the screen in the overview camera).
pub fn map_axis_inverted(
    value: f64,
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
) -> f64 {
    let span = domain_max - domain_min;
    if span == 0.0 {
        return range_min;
    }
    let v = clamp_to_domain(value, domain_min, domain_max);
    (domain_max - v) * (range_max - range_min) / span + range_min
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn maps_linearly_inside_domain() {
        assert_relative_eq!(map_axis(75.0, 0.0, 150.0, 0.0, 1.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(map_axis(250.0, 0.0, 1000.0, 0.0, 1.0), 0.25, epsilon = 1e-12);
        assert_relative_eq!(map_axis(5.0, 0.0, 10.0, -8.0, 8.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn clamps_outside_domain() {
        for v in [-1.0, -500.0, f64::NEG_INFINITY] {
            assert_eq!(map_axis(v, 0.0, 150.0, 0.0, 1.0), map_axis(0.0, 0.0, 150.0, 0.0, 1.0));
            assert_eq!(
                map_axis_inverted(v, 0.0, 120.0, 0.0, 1.0),
                map_axis_inverted(0.0, 0.0, 120.0, 0.0, 1.0)
            );
        }
        for v in [151.0, 9000.0, f64::INFINITY] {
            assert_eq!(map_axis(v, 0.0, 150.0, 0.0, 1.0), map_axis(150.0, 0.0, 150.0, 0.0, 1.0));
        }
    }

    #[test]
    fn inverted_is_monotonically_decreasing() {
        let samples: Vec<f64> = (0..=60).map(|i| i as f64 * 2.0).collect();
        for pair in samples.windows(2) {
            let a = map_axis_inverted(pair[0], 0.0, 120.0, 0.0, 1.0);
            let b = map_axis_inverted(pair[1], 0.0, 120.0, 0.0, 1.0);
            assert!(a >= b, "{} -> {a}, {} -> {b}", pair[0], pair[1]);
        }
        assert_relative_eq!(map_axis_inverted(120.0, 0.0, 120.0, 0.0, 1.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(map_axis_inverted(0.0, 0.0, 120.0, 0.0, 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(map_axis_inverted(0.15, 0.0, 0.6, 0.0, 1.0), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_domain_and_nan_do_not_blow_up() {
        assert_eq!(map_axis(3.0, 2.0, 2.0, 0.0, 1.0), 0.0);
        assert_eq!(map_axis_inverted(3.0, 2.0, 2.0, 0.0, 1.0), 0.0);
        assert_eq!(map_axis(f64::NAN, 0.0, 10.0, 0.0, 1.0), 0.0);
    }
}
