use std::collections::BTreeMap;

use crate::chart::category::{CategoryFilter, SubProperty, SubPropertySet};
use crate::chart::items::{BaseItem, VisualItems, CUBE_SIZE};
use crate::chart::units::UnitSystem;

/// Everything the filter controls currently select.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub category: CategoryFilter,
    pub enabled: SubPropertySet,
    pub min_conductivity: f64,
    pub min_tensile: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            enabled: SubPropertySet::default(),
            min_conductivity: 0.0,
            min_tensile: 0.0,
        }
    }
}

impl FilterState {
    /// Unchecked sub-properties, "no minimum" thresholds. Keeps the category.
    pub fn clear_selections(&mut self) {
        self.enabled.clear();
        self.min_conductivity = 0.0;
        self.min_tensile = 0.0;
    }
}

/// One re-layout step for a sub-property family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restack {
    /// Stack the family contiguously right above the base cube.
    AboveBase(SubProperty),
    /// Stack the family right above the highest visible item of `reference`.
    /// No-op for a base with no visible `reference` items.
    AboveFamily {
        family: SubProperty,
        reference: SubProperty,
    },
}

/// Re-layout steps for a filter state, in application order.
///
/// The soft resistance / flex life rule applies under every category. The
/// stress relaxation / spring / formability rules only apply to the wire
/// categories.
pub fn restack_plan(filter: &FilterState) -> Vec<Restack> {
    use SubProperty::*;

    if filter.enabled.is_empty() {
        return Vec::new();
    }
    let on = |p: SubProperty| filter.enabled.contains(p);
    let mut plan = Vec::new();

    if on(SoftResistance) && !on(FlexLife) {
        plan.push(Restack::AboveBase(SoftResistance));
    }

    if filter.category.is_wire() {
        let (form, stress, spring) = (on(Formability), on(StressRelaxation), on(SpringProperties));
        match (form, stress, spring) {
            (true, false, false) => plan.push(Restack::AboveBase(Formability)),
            (true, true, false) => plan.push(Restack::AboveFamily {
                family: Formability,
                reference: StressRelaxation,
            }),
            (true, false, true) => {
                plan.push(Restack::AboveBase(SpringProperties));
                plan.push(Restack::AboveFamily {
                    family: Formability,
                    reference: SpringProperties,
                });
            }
            (false, false, true) => plan.push(Restack::AboveBase(SpringProperties)),
            _ => {}
        }
    }

    plan
}

/// Whether a base passes the category and both thresholds. An absent
/// measurement fails its threshold.
fn base_passes(filter: &FilterState, unit: UnitSystem, base: &BaseItem) -> bool {
    let meets = |value: Option<f64>, min: f64| value.is_some_and(|v| v >= min);
    filter.category.matches(base.category)
        && meets(base.measurements.conductivity(unit), filter.min_conductivity)
        && meets(base.measurements.tensile(unit), filter.min_tensile)
}

/// Derive visibility and stack heights for every item from `filter`.
///
/// Everything is recomputed from the items' stored nominal heights, so
/// calling this repeatedly with the same inputs gives the same result.
pub fn apply_filter(items: &mut VisualItems, filter: &FilterState, unit: UnitSystem) {
    for base in &mut items.bases {
        base.visible = base_passes(filter, unit, base);
    }

    let base_visible: Vec<bool> = items.bases.iter().map(|b| b.visible).collect();
    for stack in &mut items.stacks {
        let owner_visible = base_visible.get(stack.base_id).copied().unwrap_or(false);
        stack.visible = owner_visible && filter.enabled.contains(stack.property);
        stack.y = stack.nominal_y;
    }

    let plan = restack_plan(filter);
    if plan.is_empty() {
        return;
    }

    let mut by_base: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, stack) in items.stacks.iter().enumerate() {
        by_base.entry(stack.base_id).or_default().push(idx);
    }

    for (base_id, indices) in &by_base {
        let Some(base_y) = items.bases.get(*base_id).map(|b| b.position[1]) else {
            continue;
        };
        for step in &plan {
            apply_step(items, indices, base_y, *step);
        }
    }
}

/// Indices of the visible items of `family`, lowest nominal height first.
fn visible_family(items: &VisualItems, indices: &[usize], family: SubProperty) -> Vec<usize> {
    let mut selected: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| items.stacks[i].visible && items.stacks[i].property == family)
        .collect();
    selected.sort_by(|&a, &b| {
        items.stacks[a]
            .nominal_y
            .partial_cmp(&items.stacks[b].nominal_y)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    selected
}

fn apply_step(items: &mut VisualItems, indices: &[usize], base_y: f64, step: Restack) {
    match step {
        Restack::AboveBase(family) => {
            // The first slot above a base lines up with the first nominal slot.
            let start = base_y + 2.0 * CUBE_SIZE - 0.5;
            for (n, i) in visible_family(items, indices, family).into_iter().enumerate() {
                items.stacks[i].y = start + n as f64 * CUBE_SIZE;
            }
        }
        Restack::AboveFamily { family, reference } => {
            let top = visible_family(items, indices, reference)
                .into_iter()
                .map(|i| items.stacks[i].y)
                .fold(f64::NEG_INFINITY, f64::max);
            if !top.is_finite() {
                return;
            }
            for (n, i) in visible_family(items, indices, family).into_iter().enumerate() {
                items.stacks[i].y = top + CUBE_SIZE + n as f64 * CUBE_SIZE;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::category::ProductCategory;
    use crate::chart::items::{Measurements, StackItem};
    use approx::assert_relative_eq;

    fn base(id: usize, category: ProductCategory, conductivity: f64, tensile: f64) -> BaseItem {
        BaseItem {
            id,
            category: Some(category),
            name: format!("Product {id}"),
            shortname: format!("P{id}"),
            url: String::new(),
            measurements: Measurements {
                tensile_e: Some(tensile),
                tensile_m: Some(tensile * 6.9),
                conductivity_e: Some(conductivity),
                conductivity_m: Some(conductivity * 0.0058),
            },
            color: [0, 0, 0, 255],
            position: [0.0, 0.0, 0.0],
            visible: false,
        }
    }

    fn stack(base_id: usize, property: SubProperty, nominal_y: f64) -> StackItem {
        StackItem {
            base_id,
            property,
            color: property.color(),
            floor: [0.0, 0.0],
            nominal_y,
            y: nominal_y,
            visible: false,
        }
    }

    fn filter(category: CategoryFilter, enabled: &[SubProperty]) -> FilterState {
        FilterState {
            category,
            enabled: SubPropertySet::from_enabled(enabled),
            ..Default::default()
        }
    }

    fn ys(items: &VisualItems, property: SubProperty) -> Vec<f64> {
        items
            .stacks
            .iter()
            .filter(|s| s.property == property)
            .map(|s| s.y)
            .collect()
    }

    #[test]
    fn thresholds_and_category_gate_base_visibility() {
        let mut items = VisualItems {
            bases: vec![
                base(0, ProductCategory::AlloyConductors, 25.0, 60.0),
                base(1, ProductCategory::AlloyConductors, 15.0, 60.0),
                base(2, ProductCategory::AlloyWire, 25.0, 60.0),
            ],
            stacks: Vec::new(),
        };
        let f = FilterState {
            category: CategoryFilter::Only(ProductCategory::AlloyConductors),
            min_conductivity: 20.0,
            min_tensile: 50.0,
            ..Default::default()
        };
        apply_filter(&mut items, &f, UnitSystem::English);
        assert!(items.bases[0].visible);
        assert!(!items.bases[1].visible);
        assert!(!items.bases[2].visible);

        let all = FilterState { category: CategoryFilter::All, ..f };
        apply_filter(&mut items, &all, UnitSystem::English);
        assert!(items.bases[0].visible);
        assert!(!items.bases[1].visible);
        assert!(items.bases[2].visible);
    }

    #[test]
    fn metric_mode_reads_metric_measurements() {
        let mut items = VisualItems {
            bases: vec![base(0, ProductCategory::AlloyWire, 50.0, 100.0)],
            stacks: Vec::new(),
        };
        let f = FilterState {
            category: CategoryFilter::Only(ProductCategory::AlloyWire),
            min_conductivity: 0.25,
            min_tensile: 650.0,
            ..Default::default()
        };
        // 50 * 0.0058 = 0.29, 100 * 6.9 = 690
        apply_filter(&mut items, &f, UnitSystem::Metric);
        assert!(items.bases[0].visible);
        // In English the same thresholds read as 0.25 % IACS and 650 ksi.
        apply_filter(&mut items, &f, UnitSystem::English);
        assert!(!items.bases[0].visible);
    }

    #[test]
    fn absent_measurement_fails_every_threshold() {
        let mut b = base(0, ProductCategory::AlloyWire, 10.0, 10.0);
        b.measurements.conductivity_e = None;
        let mut items = VisualItems { bases: vec![b], stacks: Vec::new() };
        apply_filter(
            &mut items,
            &filter(CategoryFilter::Only(ProductCategory::AlloyWire), &[]),
            UnitSystem::English,
        );
        assert!(!items.bases[0].visible);
    }

    #[test]
    fn stack_visibility_is_base_gated() {
        let mut items = VisualItems {
            bases: vec![
                base(0, ProductCategory::AlloyConductors, 30.0, 30.0),
                base(1, ProductCategory::AlloyConductors, 5.0, 30.0),
            ],
            stacks: vec![
                stack(0, SubProperty::FlexLife, 0.5),
                stack(0, SubProperty::SoftResistance, 0.9),
                stack(1, SubProperty::FlexLife, 0.5),
                stack(1, SubProperty::SoftResistance, 0.9),
            ],
        };
        let mut f = filter(
            CategoryFilter::Only(ProductCategory::AlloyConductors),
            &[SubProperty::FlexLife, SubProperty::SoftResistance],
        );
        f.min_conductivity = 10.0;
        apply_filter(&mut items, &f, UnitSystem::English);

        assert!(items.stacks[0].visible);
        assert!(items.stacks[1].visible);
        assert!(!items.stacks[2].visible);
        assert!(!items.stacks[3].visible);
        for s in &items.stacks {
            if s.visible {
                assert!(items.bases[s.base_id].visible);
            }
        }
    }

    #[test]
    fn soft_resistance_alone_restacks_in_nominal_order() {
        let mut items = VisualItems {
            bases: vec![base(0, ProductCategory::AlloyConductors, 30.0, 30.0)],
            stacks: vec![
                stack(0, SubProperty::SoftResistance, 0.3),
                stack(0, SubProperty::SoftResistance, 0.1),
                stack(0, SubProperty::SoftResistance, 0.2),
            ],
        };
        let f = filter(
            CategoryFilter::Only(ProductCategory::AlloyConductors),
            &[SubProperty::SoftResistance],
        );
        apply_filter(&mut items, &f, UnitSystem::English);

        let s = CUBE_SIZE;
        let first = 2.0 * s - 0.5;
        // The item with nominal 0.1 ends up lowest.
        assert_relative_eq!(items.stacks[1].y, first, epsilon = 1e-9);
        assert_relative_eq!(items.stacks[2].y, first + s, epsilon = 1e-9);
        assert_relative_eq!(items.stacks[0].y, first + 2.0 * s, epsilon = 1e-9);
    }

    #[test]
    fn soft_with_flex_keeps_nominal_heights() {
        let mut items = VisualItems {
            bases: vec![base(0, ProductCategory::AlloyConductors, 30.0, 30.0)],
            stacks: vec![
                stack(0, SubProperty::FlexLife, 0.5),
                stack(0, SubProperty::SoftResistance, 0.9),
            ],
        };
        let f = filter(
            CategoryFilter::Only(ProductCategory::AlloyConductors),
            &[SubProperty::FlexLife, SubProperty::SoftResistance],
        );
        apply_filter(&mut items, &f, UnitSystem::English);
        assert_eq!(ys(&items, SubProperty::SoftResistance), vec![0.9]);
    }

    #[test]
    fn formability_stacks_above_tallest_stress_relaxation() {
        let mut items = VisualItems {
            bases: vec![base(0, ProductCategory::AlloyWire, 30.0, 30.0)],
            stacks: vec![
                stack(0, SubProperty::StressRelaxation, 0.5),
                stack(0, SubProperty::StressRelaxation, 0.9),
                stack(0, SubProperty::SpringProperties, 1.3),
                stack(0, SubProperty::Formability, 1.7),
                stack(0, SubProperty::Formability, 2.1),
            ],
        };
        let f = filter(
            CategoryFilter::Only(ProductCategory::AlloyWire),
            &[SubProperty::Formability, SubProperty::StressRelaxation],
        );
        apply_filter(&mut items, &f, UnitSystem::English);

        let form = ys(&items, SubProperty::Formability);
        assert_relative_eq!(form[0], 0.9 + CUBE_SIZE, epsilon = 1e-9);
        assert_relative_eq!(form[1], 0.9 + 2.0 * CUBE_SIZE, epsilon = 1e-9);
        // Not directly above the base.
        assert!(form[0] > 2.0 * CUBE_SIZE - 0.5 + 1e-6);
        assert_eq!(ys(&items, SubProperty::StressRelaxation), vec![0.5, 0.9]);
    }

    #[test]
    fn formability_with_spring_restacks_both() {
        let mut items = VisualItems {
            bases: vec![base(0, ProductCategory::FineWire, 30.0, 30.0)],
            stacks: vec![
                stack(0, SubProperty::StressRelaxation, 0.5),
                stack(0, SubProperty::SpringProperties, 0.9),
                stack(0, SubProperty::SpringProperties, 1.3),
                stack(0, SubProperty::Formability, 1.7),
            ],
        };
        let f = filter(
            CategoryFilter::Only(ProductCategory::FineWire),
            &[SubProperty::Formability, SubProperty::SpringProperties],
        );
        apply_filter(&mut items, &f, UnitSystem::English);

        let spring = ys(&items, SubProperty::SpringProperties);
        assert_relative_eq!(spring[0], 0.3, epsilon = 1e-9);
        assert_relative_eq!(spring[1], 0.7, epsilon = 1e-9);
        assert_relative_eq!(ys(&items, SubProperty::Formability)[0], 1.1, epsilon = 1e-9);
    }

    #[test]
    fn wire_rules_do_not_apply_to_conductors() {
        let f = filter(
            CategoryFilter::Only(ProductCategory::AlloyConductors),
            &[SubProperty::Formability],
        );
        assert!(restack_plan(&f).is_empty());

        let f = filter(
            CategoryFilter::Only(ProductCategory::AlloyWire),
            &[SubProperty::Formability],
        );
        assert_eq!(restack_plan(&f), vec![Restack::AboveBase(SubProperty::Formability)]);
    }

    #[test]
    fn plan_covers_each_policy_row() {
        use SubProperty::*;
        let wire = CategoryFilter::Only(ProductCategory::AlloyWire);
        assert_eq!(
            restack_plan(&filter(wire, &[SpringProperties])),
            vec![Restack::AboveBase(SpringProperties)]
        );
        assert_eq!(
            restack_plan(&filter(wire, &[SpringProperties, StressRelaxation])),
            vec![]
        );
        assert_eq!(
            restack_plan(&filter(wire, &[Formability, StressRelaxation, SpringProperties])),
            vec![]
        );
        assert_eq!(
            restack_plan(&filter(wire, &[Formability, SpringProperties])),
            vec![
                Restack::AboveBase(SpringProperties),
                Restack::AboveFamily { family: Formability, reference: SpringProperties },
            ]
        );
    }

    #[test]
    fn reapplying_is_idempotent_and_restores_nominal() {
        let mut items = VisualItems {
            bases: vec![
                base(0, ProductCategory::AlloyWire, 30.0, 30.0),
                base(1, ProductCategory::AlloyWire, 40.0, 90.0),
            ],
            stacks: vec![
                stack(0, SubProperty::StressRelaxation, 0.5),
                stack(0, SubProperty::SpringProperties, 0.9),
                stack(0, SubProperty::Formability, 1.3),
                stack(1, SubProperty::Formability, 0.5),
                stack(1, SubProperty::Formability, 0.9),
            ],
        };
        let f = filter(
            CategoryFilter::Only(ProductCategory::AlloyWire),
            &[SubProperty::Formability, SubProperty::SpringProperties],
        );
        apply_filter(&mut items, &f, UnitSystem::English);
        let once = items.clone();
        apply_filter(&mut items, &f, UnitSystem::English);
        assert_eq!(items, once);

        let cleared = filter(CategoryFilter::Only(ProductCategory::AlloyWire), &[]);
        apply_filter(&mut items, &cleared, UnitSystem::English);
        assert!(items.stacks.iter().all(|s| s.y == s.nominal_y && !s.visible));
    }
}
