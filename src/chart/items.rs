use crate::chart::category::{ProductCategory, SubProperty};
use crate::chart::mapping::{map_axis, map_axis_inverted};
use crate::chart::units::UnitSystem;
use crate::data::dataset::DataPoint;

/// Floor columns (tensile direction).
pub const GRID_COLUMNS: usize = 16;
/// Floor rows (conductivity direction).
pub const GRID_ROWS: usize = 7;
/// Edge length of a stack cube in chart units.
pub const CUBE_SIZE: f64 = 0.4;
/// Base cubes are half as tall as stack cubes.
pub const BASE_HEIGHT: f64 = CUBE_SIZE / 2.0;
/// Whole chart is drawn at this scale in world space.
pub const SCENE_SCALE: f32 = 0.55;

/// Half extents of the floor in chart units.
pub fn floor_half_extents() -> (f64, f64) {
    (GRID_COLUMNS as f64 / 2.0, GRID_ROWS as f64 / 2.0)
}

/// Fallback for unparsable color strings.
pub const FALLBACK_COLOR: [u8; 4] = [150, 150, 150, 255];

/// Measurements carried by a base item, in both unit systems.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub tensile_e: Option<f64>,
    pub tensile_m: Option<f64>,
    pub conductivity_e: Option<f64>,
    pub conductivity_m: Option<f64>,
}

impl Measurements {
    pub fn from_point(point: &DataPoint) -> Self {
        Self {
            tensile_e: point.x_tensile_e,
            tensile_m: point.x_tensile_m,
            conductivity_e: point.y_conduct_e,
            conductivity_m: point.y_conduct_m,
        }
    }

    pub fn tensile(&self, unit: UnitSystem) -> Option<f64> {
        match unit {
            UnitSystem::English => self.tensile_e,
            UnitSystem::Metric => self.tensile_m,
        }
    }

    pub fn conductivity(&self, unit: UnitSystem) -> Option<f64> {
        match unit {
            UnitSystem::English => self.conductivity_e,
            UnitSystem::Metric => self.conductivity_m,
        }
    }
}

/// The half-height cube that represents one product.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseItem {
    pub id: usize,
    pub category: Option<ProductCategory>,
    pub name: String,
    pub shortname: String,
    pub url: String,
    pub measurements: Measurements,
    pub color: [u8; 4],
    /// Centre of the cube in chart units: [x, y, z].
    pub position: [f64; 3],
    pub visible: bool,
}

/// One stacked unit of a sub-property above a base item.
#[derive(Debug, Clone, PartialEq)]
pub struct StackItem {
    pub base_id: usize,
    pub property: SubProperty,
    pub color: [u8; 4],
    /// Floor position shared with the owning base: [x, z].
    pub floor: [f64; 2],
    /// Centre height as laid out at build time.
    pub nominal_y: f64,
    /// Centre height after the current filter's re-layout.
    pub y: f64,
    pub visible: bool,
}

impl StackItem {
    pub fn position(&self) -> [f64; 3] {
        [self.floor[0], self.y, self.floor[1]]
    }
}

/// All cubes derived from the current dataset and unit system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualItems {
    pub bases: Vec<BaseItem>,
    pub stacks: Vec<StackItem>,
}

/// Parse "#rrggbb" (or "#rrggbbaa") into RGBA; unparsable strings get grey.
pub fn parse_color(hex: Option<&str>) -> [u8; 4] {
    let Some(hex) = hex else {
        return FALLBACK_COLOR;
    };
    match egui::Color32::from_hex(hex.trim()) {
        Ok(c) => c.to_srgba_unmultiplied(),
        Err(_) => {
            tracing::warn!("Unparsable color {hex:?}, using grey");
            FALLBACK_COLOR
        }
    }
}

/// Floor position of a product: tensile along X, conductivity along Z with
/// higher readings toward -Z.
pub fn floor_position(measurements: &Measurements, unit: UnitSystem) -> [f64; 2] {
    let (t_lo, t_hi) = unit.tensile_domain();
    let (c_lo, c_hi) = unit.conductivity_domain();
    let tensile = measurements.tensile(unit).unwrap_or(t_lo);
    let conductivity = measurements.conductivity(unit).unwrap_or(c_lo);

    let x = (map_axis(tensile, t_lo, t_hi, 0.0, 1.0) - 0.5) * GRID_COLUMNS as f64;
    let z = (map_axis_inverted(conductivity, c_lo, c_hi, 0.0, 1.0) - 0.5) * GRID_ROWS as f64;
    [x, z]
}

/// Nominal centre height of unit `j` (1-based) of a family whose stack
/// starts at running height `start`.
pub fn nominal_stack_y(start: f64, j: u32) -> f64 {
    start + j as f64 * CUBE_SIZE + 0.1
}

impl VisualItems {
    /// Build base and stack items for every point. Item ids are list indices.
    pub fn build(points: &[DataPoint], unit: UnitSystem) -> Self {
        let mut bases = Vec::with_capacity(points.len());
        let mut stacks = Vec::new();

        for (id, point) in points.iter().enumerate() {
            let measurements = Measurements::from_point(point);
            let floor = floor_position(&measurements, unit);

            bases.push(BaseItem {
                id,
                category: point.primary_category(),
                name: point.product_name.clone(),
                shortname: point.product_shortname.clone(),
                url: point.product_url.clone(),
                measurements,
                color: parse_color(point.primary_color()),
                position: [floor[0], BASE_HEIGHT, floor[1]],
                visible: true,
            });

            let mut running = 0.0;
            for property in SubProperty::ALL {
                let count = property.count_in(point);
                for j in 1..=count {
                    let y = nominal_stack_y(running, j);
                    stacks.push(StackItem {
                        base_id: id,
                        property,
                        color: property.color(),
                        floor,
                        nominal_y: y,
                        y,
                        visible: false,
                    });
                }
                running += count as f64 * CUBE_SIZE;
            }
        }

        tracing::debug!("Built {} base and {} stack items", bases.len(), stacks.len());
        Self { bases, stacks }
    }

    pub fn base(&self, id: usize) -> Option<&BaseItem> {
        self.bases.get(id).filter(|b| b.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn clear(&mut self) {
        self.bases.clear();
        self.stacks.clear();
    }
}
