use crate::chart::category::{CategoryFilter, SubProperty};
use crate::chart::filter::{apply_filter, FilterState};
use crate::chart::items::VisualItems;
use crate::chart::units::UnitSystem;
use crate::data::dataset::DataPoint;
use crate::state::theme::Theme;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dataset, derived items and the current filter selection.
///
/// Every mutation goes through a method here and re-derives visibility, so
/// the items always reflect `filter` and `unit`.
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    unit: UnitSystem,
    points: Vec<DataPoint>,
    items: VisualItems,
    filter: FilterState,
    labels_visible: bool,
}

impl ChartState {
    pub fn new(unit: UnitSystem, labels_visible: bool) -> Self {
        Self {
            unit,
            labels_visible,
            ..Default::default()
        }
    }

    pub fn unit(&self) -> UnitSystem {
        self.unit
    }

    pub fn items(&self) -> &VisualItems {
        &self.items
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    /// Swap in a freshly loaded dataset and rebuild everything from it.
    pub fn replace_dataset(&mut self, points: Vec<DataPoint>) {
        self.points = points;
        self.items = VisualItems::build(&self.points, self.unit);
        self.refresh();
    }

    /// Switch unit systems. Everything is reset and the dataset dropped;
    /// returns `true` when the caller must load it again.
    pub fn set_unit_system(&mut self, unit: UnitSystem) -> bool {
        if unit == self.unit {
            return false;
        }
        tracing::info!("Switching to {} units", unit.label());
        self.unit = unit;
        self.filter = FilterState::default();
        self.points.clear();
        self.items.clear();
        true
    }

    /// Radio selection. Thresholds go back to "no minimum" and every
    /// sub-property is unchecked.
    pub fn select_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
        self.filter.clear_selections();
        self.refresh();
    }

    /// Toggle a checkbox. Ignored for sub-properties the current category
    /// does not offer.
    pub fn set_sub_property(&mut self, property: SubProperty, enabled: bool) {
        if enabled && !self.filter.category.allows(property) {
            return;
        }
        self.filter.enabled.set(property, enabled);
        self.refresh();
    }

    pub fn set_min_conductivity(&mut self, value: f64) {
        self.filter.min_conductivity = value;
        self.refresh();
    }

    pub fn set_min_tensile(&mut self, value: f64) {
        self.filter.min_tensile = value;
        self.refresh();
    }

    pub fn set_labels_visible(&mut self, visible: bool) {
        self.labels_visible = visible;
    }

    /// Back to "All" with nothing checked and no minimums.
    pub fn reset(&mut self) {
        self.select_category(CategoryFilter::All);
    }

    /// Ids of the bases whose data label is shown.
    pub fn visible_label_ids(&self) -> Vec<usize> {
        if !self.labels_visible {
            return Vec::new();
        }
        self.items
            .bases
            .iter()
            .filter(|b| b.visible)
            .map(|b| b.id)
            .collect()
    }

    fn refresh(&mut self) {
        apply_filter(&mut self.items, &self.filter, self.unit);
    }
}

/// Top-level UI state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub chart: ChartState,
    pub theme: Theme,
    /// Page opened when a data label is clicked.
    pub brand_url: String,
}

impl AppState {
    pub fn new(chart: ChartState, theme: Theme, brand_url: String) -> Self {
        Self {
            chart,
            theme,
            brand_url,
        }
    }
}
