use crate::chart::category::{CategoryFilter, SubProperty};
use crate::chart::units::UnitSystem;
use crate::state::app_state::ChartState;

/// Filter changes requested from the control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    SelectCategory(CategoryFilter),
    SetSubProperty(SubProperty, bool),
    SetMinConductivity(f64),
    SetMinTensile(f64),
    SetUnit(UnitSystem),
    SetLabelsVisible(bool),
    Reset,
}

/// Helper to create a selected/toggled button.
fn toggle_btn(ui: &mut egui::Ui, enabled: bool, label: &str, active: bool) -> egui::Response {
    let btn = if active {
        egui::Button::new(egui::RichText::new(label).strong())
            .fill(ui.visuals().selection.bg_fill)
            .min_size(egui::vec2(70.0, 26.0))
    } else {
        egui::Button::new(label).min_size(egui::vec2(70.0, 26.0))
    };
    ui.add_enabled(enabled, btn)
}

/// Dropdown over `candidates`. The first candidate is shown as "No minimum".
fn threshold_combo(
    ui: &mut egui::Ui,
    id: &str,
    current: f64,
    candidates: &[f64],
    format: impl Fn(f64) -> String,
) -> Option<f64> {
    let text = |v: f64| {
        if candidates.first() == Some(&v) {
            "No minimum".to_string()
        } else {
            format(v)
        }
    };

    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(text(current))
        .width(140.0)
        .show_ui(ui, |ui| {
            for &value in candidates {
                if ui.selectable_label(value == current, text(value)).clicked() && value != current {
                    picked = Some(value);
                }
            }
        });
    picked
}

/// Render the filter side panel. `loading` disables the unit toggle.
pub fn show_controls(ui: &mut egui::Ui, chart: &ChartState, loading: bool) -> Vec<ControlAction> {
    let mut actions = Vec::new();
    let filter = chart.filter();
    let unit = chart.unit();

    ui.heading("Product");
    ui.add_space(4.0);
    for choice in CategoryFilter::CHOICES {
        if ui.radio(filter.category == choice, choice.label()).clicked() && filter.category != choice {
            actions.push(ControlAction::SelectCategory(choice));
        }
    }

    ui.add_space(10.0);
    ui.separator();
    ui.heading("Properties");
    ui.add_space(4.0);
    for property in SubProperty::ALL {
        let allowed = filter.category.allows(property);
        let mut on = filter.enabled.contains(property);
        let label = egui::RichText::new(property.label());
        let [r, g, b, _] = property.color();
        ui.horizontal(|ui| {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            let fill = egui::Color32::from_rgb(r, g, b);
            let fill = if allowed { fill } else { fill.gamma_multiply(0.35) };
            ui.painter().rect_filled(swatch, 2.0, fill);
            if ui.add_enabled(allowed, egui::Checkbox::new(&mut on, label)).changed() {
                actions.push(ControlAction::SetSubProperty(property, on));
            }
        });
    }

    ui.add_space(10.0);
    ui.separator();
    ui.heading("Minimums");
    ui.add_space(4.0);
    ui.label("Conductivity");
    if let Some(v) = threshold_combo(
        ui,
        "min_conductivity",
        filter.min_conductivity,
        &unit.conductivity_thresholds(),
        |v| format!("{} {}", unit.format_conductivity(v), unit.conductivity_unit()),
    ) {
        actions.push(ControlAction::SetMinConductivity(v));
    }
    ui.add_space(4.0);
    ui.label("Tensile strength");
    if let Some(v) = threshold_combo(
        ui,
        "min_tensile",
        filter.min_tensile,
        &unit.tensile_thresholds(),
        |v| format!("{} {}", unit.format_tensile(v), unit.tensile_unit()),
    ) {
        actions.push(ControlAction::SetMinTensile(v));
    }

    ui.add_space(10.0);
    ui.separator();
    ui.heading("Units");
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for choice in [UnitSystem::English, UnitSystem::Metric] {
            if toggle_btn(ui, !loading, choice.label(), unit == choice).clicked() && unit != choice {
                actions.push(ControlAction::SetUnit(choice));
            }
        }
    });

    ui.add_space(6.0);
    ui.label("Labels");
    ui.horizontal(|ui| {
        let visible = chart.labels_visible();
        if toggle_btn(ui, true, "On", visible).clicked() && !visible {
            actions.push(ControlAction::SetLabelsVisible(true));
        }
        if toggle_btn(ui, true, "Off", !visible).clicked() && visible {
            actions.push(ControlAction::SetLabelsVisible(false));
        }
    });

    ui.add_space(12.0);
    if ui
        .add(egui::Button::new(egui::RichText::new("Reset").strong()).min_size(egui::vec2(148.0, 28.0)))
        .clicked()
    {
        actions.push(ControlAction::Reset);
    }

    actions
}
