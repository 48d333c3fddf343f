use serde::{Deserialize, Serialize};

use crate::data::dataset::DataPoint;

/// Product family a data point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    AlloyConductors,
    AlloyWire,
    FineWire,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [
        ProductCategory::AlloyConductors,
        ProductCategory::AlloyWire,
        ProductCategory::FineWire,
    ];

    /// Tag string used in the dataset's `type` array.
    pub fn tag(&self) -> &'static str {
        match self {
            ProductCategory::AlloyConductors => "Alloy Conductors",
            ProductCategory::AlloyWire => "Alloy Wire",
            ProductCategory::FineWire => "Fine Wire",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag.trim())
    }

    pub fn is_wire(&self) -> bool {
        matches!(self, ProductCategory::AlloyWire | ProductCategory::FineWire)
    }
}

/// The product-type radio selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ProductCategory),
}

impl CategoryFilter {
    pub const CHOICES: [CategoryFilter; 4] = [
        CategoryFilter::All,
        CategoryFilter::Only(ProductCategory::AlloyConductors),
        CategoryFilter::Only(ProductCategory::AlloyWire),
        CategoryFilter::Only(ProductCategory::FineWire),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.tag(),
        }
    }

    /// Whether a base item with the given primary category passes.
    ///
    /// `All` leaves out the flattened Fine Wire copies: every one of them
    /// duplicates a product that is already drawn at the same floor spot.
    pub fn matches(&self, category: Option<ProductCategory>) -> bool {
        match (self, category) {
            (CategoryFilter::All, Some(c)) => c != ProductCategory::FineWire,
            (CategoryFilter::All, None) => false,
            (CategoryFilter::Only(want), Some(c)) => *want == c,
            (CategoryFilter::Only(_), None) => false,
        }
    }

    /// Wire categories get the stress/spring/formability restack rules.
    pub fn is_wire(&self) -> bool {
        match self {
            CategoryFilter::All => false,
            CategoryFilter::Only(c) => c.is_wire(),
        }
    }

    /// Sub-property checkboxes that are enabled under this category.
    pub fn allows(&self, property: SubProperty) -> bool {
        match self {
            CategoryFilter::All => false,
            CategoryFilter::Only(ProductCategory::AlloyConductors) => matches!(
                property,
                SubProperty::SoftResistance | SubProperty::FlexLife
            ),
            CategoryFilter::Only(_) => matches!(
                property,
                SubProperty::StressRelaxation
                    | SubProperty::SpringProperties
                    | SubProperty::Formability
            ),
        }
    }
}

/// One of the five stacked performance families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubProperty {
    FlexLife,
    SoftResistance,
    StressRelaxation,
    SpringProperties,
    Formability,
}

impl SubProperty {
    /// Stacking order, bottom to top.
    pub const ALL: [SubProperty; 5] = [
        SubProperty::FlexLife,
        SubProperty::SoftResistance,
        SubProperty::StressRelaxation,
        SubProperty::SpringProperties,
        SubProperty::Formability,
    ];

    pub fn index(&self) -> usize {
        match self {
            SubProperty::FlexLife => 0,
            SubProperty::SoftResistance => 1,
            SubProperty::StressRelaxation => 2,
            SubProperty::SpringProperties => 3,
            SubProperty::Formability => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubProperty::FlexLife => "Flex Life",
            SubProperty::SoftResistance => "Soft Resistance",
            SubProperty::StressRelaxation => "Stress Relaxation",
            SubProperty::SpringProperties => "Spring Properties",
            SubProperty::Formability => "Formability",
        }
    }

    /// Cube color for this family.
    pub fn color(&self) -> [u8; 4] {
        match self {
            SubProperty::FlexLife | SubProperty::StressRelaxation => [0xbe, 0xce, 0x71, 255],
            SubProperty::SoftResistance => [0x69, 0x7b, 0xa6, 255],
            SubProperty::SpringProperties => [0x6c, 0xb2, 0xc4, 255],
            SubProperty::Formability => [0xcf, 0xc2, 0x50, 255],
        }
    }

    /// Number of stacked units this family contributes for a data point.
    pub fn count_in(&self, point: &DataPoint) -> u32 {
        match self {
            SubProperty::FlexLife => point.flex_life,
            SubProperty::SoftResistance => point.soft_resistance,
            SubProperty::StressRelaxation => point.stress_relaxation,
            SubProperty::SpringProperties => point.spring_properties,
            SubProperty::Formability => point.formability,
        }
    }
}

/// Enabled flag per sub-property (the checkbox group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubPropertySet([bool; 5]);

impl SubPropertySet {
    pub fn contains(&self, property: SubProperty) -> bool {
        self.0[property.index()]
    }

    pub fn set(&mut self, property: SubProperty, enabled: bool) {
        self.0[property.index()] = enabled;
    }

    pub fn clear(&mut self) {
        self.0 = [false; 5];
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&on| on)
    }

    pub fn from_enabled(enabled: &[SubProperty]) -> Self {
        let mut set = Self::default();
        for &p in enabled {
            set.set(p, true);
        }
        set
    }
}
