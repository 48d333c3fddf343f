use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::chart::category::ProductCategory;

/// One product record as served by the dataset endpoint.
///
/// The endpoint is loose about types (numbers sometimes arrive as strings,
/// fields go missing), so every field decodes leniently instead of failing
/// the whole load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataPoint {
    #[serde(rename = "type", deserialize_with = "lenient_strings")]
    pub types: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub color: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub product_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub product_shortname: String,
    #[serde(deserialize_with = "lenient_string")]
    pub product_url: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub x_tensile_e: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub x_tensile_m: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub y_conduct_e: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub y_conduct_m: Option<f64>,
    #[serde(deserialize_with = "lenient_count")]
    pub flex_life: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub soft_resistance: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub stress_relaxation: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub spring_properties: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub formability: u32,
}

impl DataPoint {
    pub fn has_tag(&self, category: ProductCategory) -> bool {
        self.types.iter().any(|t| t.trim() == category.tag())
    }

    /// The first tag decides the base cube's category and color.
    pub fn primary_category(&self) -> Option<ProductCategory> {
        self.types.first().and_then(|t| ProductCategory::from_tag(t))
    }

    pub fn primary_color(&self) -> Option<&str> {
        self.color.first().map(String::as_str)
    }
}

/// Reorder and split the raw records into the list the chart draws.
///
/// Alloy Wire / Alloy Conductors records come first, in source order. Then
/// every Fine Wire record is appended again as its own entry, tagged only
/// "Fine Wire" and colored with its second color when it has one. The index
/// in the returned list is the item id.
pub fn prepare_dataset(raw: Vec<DataPoint>) -> Vec<DataPoint> {
    let mut prepared: Vec<DataPoint> = raw
        .iter()
        .filter(|p| {
            p.has_tag(ProductCategory::AlloyWire) || p.has_tag(ProductCategory::AlloyConductors)
        })
        .cloned()
        .collect();

    let fine_wire = raw
        .into_iter()
        .filter(|p| p.has_tag(ProductCategory::FineWire))
        .map(|mut p| {
            p.types = vec![ProductCategory::FineWire.tag().to_string()];
            let color = p.color.get(1).or_else(|| p.color.first()).cloned();
            p.color = color.into_iter().collect();
            p
        });
    prepared.extend(fine_wire);
    prepared
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn value_to_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    v.filter(|v| v.is_finite())
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value)
        .map(|v| v.max(0.0).min(u32::MAX as f64).floor() as u32)
        .unwrap_or(0))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}
