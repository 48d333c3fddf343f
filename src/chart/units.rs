use serde::{Deserialize, Serialize};

/// Which measurement convention the chart reads and displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    English,
    Metric,
}

/// `count` values starting at zero, `step` hundredths apart.
///
/// Built from integer hundredths so that e.g. 0.15 compares equal to the
/// literal 0.15 and not 0.15000000000000002.
fn stepped(count: i64, step_hundredths: i64) -> Vec<f64> {
    (0..count)
        .map(|i| (i * step_hundredths) as f64 / 100.0)
        .collect()
}

impl UnitSystem {
    pub fn label(&self) -> &'static str {
        match self {
            UnitSystem::English => "English",
            UnitSystem::Metric => "Metric",
        }
    }

    /// Raw tensile range mapped onto the floor's X axis.
    pub fn tensile_domain(&self) -> (f64, f64) {
        match self {
            UnitSystem::English => (0.0, 150.0),
            UnitSystem::Metric => (0.0, 1000.0),
        }
    }

    /// Raw conductivity range mapped onto the floor's depth axis.
    pub fn conductivity_domain(&self) -> (f64, f64) {
        match self {
            UnitSystem::English => (0.0, 120.0),
            UnitSystem::Metric => (0.0, 0.6),
        }
    }

    /// Candidate values for the minimum-tensile dropdown. The first entry is
    /// "no minimum".
    pub fn tensile_thresholds(&self) -> Vec<f64> {
        match self {
            UnitSystem::English => stepped(16, 1000),
            UnitSystem::Metric => stepped(21, 5000),
        }
    }

    /// Candidate values for the minimum-conductivity dropdown.
    pub fn conductivity_thresholds(&self) -> Vec<f64> {
        match self {
            UnitSystem::English => stepped(11, 1000),
            UnitSystem::Metric => stepped(13, 5),
        }
    }

    /// Tick values drawn along the tensile axis.
    pub fn tensile_ticks(&self) -> Vec<f64> {
        match self {
            UnitSystem::English => stepped(15, 1000),
            UnitSystem::Metric => stepped(21, 5000),
        }
    }

    /// Tick values drawn along the conductivity axis.
    pub fn conductivity_ticks(&self) -> Vec<f64> {
        match self {
            UnitSystem::English => stepped(6, 2000),
            UnitSystem::Metric => stepped(13, 5),
        }
    }

    pub fn format_tensile(&self, value: f64) -> String {
        format!("{value:.0}")
    }

    pub fn format_conductivity(&self, value: f64) -> String {
        match self {
            UnitSystem::English => format!("{value:.0}"),
            UnitSystem::Metric => format!("{value:.2}"),
        }
    }

    pub fn tensile_unit(&self) -> &'static str {
        match self {
            UnitSystem::English => "ksi",
            UnitSystem::Metric => "MPa",
        }
    }

    pub fn conductivity_unit(&self) -> &'static str {
        match self {
            UnitSystem::English => "% IACS @ 68\u{00B0}F",
            UnitSystem::Metric => "MS/m",
        }
    }

    pub fn tensile_axis_title(&self) -> &'static str {
        match self {
            UnitSystem::English => "TENSILE STRENGTH (ksi)",
            UnitSystem::Metric => "TENSILE STRENGTH (MPa)",
        }
    }

    pub fn conductivity_axis_title(&self) -> &'static str {
        match self {
            UnitSystem::English => "CONDUCTIVITY (% IACS @ 68\u{00B0}F)",
            UnitSystem::Metric => "CONDUCTIVITY (MS/m @ 20\u{00B0}C)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: [UnitSystem; 2] = [UnitSystem::English, UnitSystem::Metric];

    #[test]
    fn threshold_lists_have_expected_shape() {
        let e = UnitSystem::English;
        assert_eq!(e.tensile_thresholds().len(), 16);
        assert_eq!(e.tensile_thresholds().last().copied(), Some(150.0));
        assert_eq!(e.conductivity_thresholds().len(), 11);
        assert_eq!(e.conductivity_thresholds().last().copied(), Some(100.0));

        let m = UnitSystem::Metric;
        assert_eq!(m.tensile_thresholds().len(), 21);
        assert_eq!(m.tensile_thresholds().last().copied(), Some(1000.0));
        assert_eq!(m.conductivity_thresholds().len(), 13);
        assert_eq!(m.conductivity_thresholds()[3], 0.15);
        assert_eq!(m.conductivity_thresholds().last().copied(), Some(0.6));
    }

    #[test]
    fn first_threshold_is_no_minimum() {
        for unit in BOTH {
            assert_eq!(unit.tensile_thresholds()[0], 0.0);
            assert_eq!(unit.conductivity_thresholds()[0], 0.0);
        }
    }

    #[test]
    fn thresholds_fall_inside_axis_domains() {
        for unit in BOTH {
            let (t_lo, t_hi) = unit.tensile_domain();
            assert!(unit.tensile_thresholds().iter().all(|v| (t_lo..=t_hi).contains(v)));
            let (c_lo, c_hi) = unit.conductivity_domain();
            assert!(unit
                .conductivity_thresholds()
                .iter()
                .all(|v| (c_lo..=c_hi).contains(v)));
        }
    }

    #[test]
    fn metric_conductivity_formats_two_decimals() {
        assert_eq!(UnitSystem::Metric.format_conductivity(0.5), "0.50");
        assert_eq!(UnitSystem::English.format_conductivity(40.0), "40");
    }
}
