use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3, Vec4};

use crate::chart::items::{
    floor_half_extents, BaseItem, VisualItems, BASE_HEIGHT, CUBE_SIZE, GRID_COLUMNS, GRID_ROWS,
    SCENE_SCALE,
};
use crate::chart::mapping::{map_axis, map_axis_inverted};
use crate::chart::units::UnitSystem;
use crate::plot3d::camera::OrbitalCamera;
use crate::plot3d::picking::{pick_nearest, ray_from_ndc, Aabb};
use crate::plot3d::renderer::create_chart_paint_callback;
use crate::render::gpu_types::{rgba_to_f32, CubeInstance, Line3DData};
use crate::state::app_state::ChartState;
use crate::state::theme::Theme;

/// Navigation requested by a click in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartAction {
    /// A cube was clicked; open the product page of this base item.
    OpenProduct(usize),
    /// A data label was clicked.
    OpenBrand,
}

/// Tensile tick labels sit this far in front of the near floor edge.
const TENSILE_TICK_OFFSET: f64 = 0.45;
/// Tensile axis title depth, in chart units.
const TENSILE_TITLE_Z: f64 = 4.7;
/// Conductivity tick labels sit this far left of the floor.
const CONDUCTIVITY_TICK_OFFSET: f64 = 0.2;

/// Chart units to world units.
pub fn world_position(p: [f64; 3]) -> Vec3 {
    Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32) * SCENE_SCALE
}

fn base_half_extents() -> Vec3 {
    let s = CUBE_SIZE as f32;
    Vec3::new(s / 2.0, BASE_HEIGHT as f32 / 2.0, s / 2.0) * SCENE_SCALE
}

fn stack_half_extents() -> Vec3 {
    Vec3::splat(CUBE_SIZE as f32 / 2.0) * SCENE_SCALE
}

/// Instances for every visible base and stack cube.
pub fn cube_instances(items: &VisualItems) -> Vec<CubeInstance> {
    let instance = |center: Vec3, half: Vec3, color: [u8; 4]| CubeInstance {
        center: center.extend(1.0).to_array(),
        half_extents: half.extend(0.0).to_array(),
        color: rgba_to_f32(color),
    };

    let bases = items
        .bases
        .iter()
        .filter(|b| b.visible)
        .map(|b| instance(world_position(b.position), base_half_extents(), b.color));
    let stacks = items
        .stacks
        .iter()
        .filter(|s| s.visible)
        .map(|s| instance(world_position(s.position()), stack_half_extents(), s.color));
    bases.chain(stacks).collect()
}

/// World-space boxes of the visible cubes, keyed by the owning base id.
pub fn pick_boxes(items: &VisualItems) -> Vec<(usize, Aabb)> {
    let bases = items.bases.iter().filter(|b| b.visible).map(|b| {
        (
            b.id,
            Aabb::from_center_half_extents(world_position(b.position), base_half_extents()),
        )
    });
    let stacks = items.stacks.iter().filter(|s| s.visible).map(|s| {
        (
            s.base_id,
            Aabb::from_center_half_extents(world_position(s.position()), stack_half_extents()),
        )
    });
    bases.chain(stacks).collect()
}

/// Floor grid segments in world space: 16 lines across, 7 lines deep,
/// spanning the whole floor.
pub fn floor_grid_segments() -> Vec<[f32; 4]> {
    let (hx, hz) = floor_half_extents();
    let (hx, hz) = (hx as f32, hz as f32);
    let point = |x: f32, z: f32| (Vec3::new(x, 0.0, z) * SCENE_SCALE).extend(1.0).to_array();

    let mut segments = Vec::with_capacity((GRID_COLUMNS + GRID_ROWS) * 2);
    let dx = 2.0 * hx / (GRID_COLUMNS - 1) as f32;
    for i in 0..GRID_COLUMNS {
        let x = -hx + i as f32 * dx;
        segments.push(point(x, -hz));
        segments.push(point(x, hz));
    }
    let dz = 2.0 * hz / (GRID_ROWS - 1) as f32;
    for j in 0..GRID_ROWS {
        let z = -hz + j as f32 * dz;
        segments.push(point(-hx, z));
        segments.push(point(hx, z));
    }
    segments
}

fn color_to_f32(c: egui::Color32) -> [f32; 4] {
    rgba_to_f32(c.to_array())
}

/// Text shown in a label: the short name, or the full name when empty.
fn label_title(base: &BaseItem) -> &str {
    if base.shortname.trim().is_empty() {
        &base.name
    } else {
        &base.shortname
    }
}

fn format_measurement(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v}"))
}

/// Expanded label content shown on hover.
pub fn label_details(base: &BaseItem, unit: UnitSystem) -> String {
    format!(
        "{}\nTensile: {} {}\nConductivity: {} {}\nCLICK FOR MORE",
        base.name,
        format_measurement(base.measurements.tensile(unit)),
        unit.tensile_unit(),
        format_measurement(base.measurements.conductivity(unit)),
        unit.conductivity_unit(),
    )
}

/// Render the 3D chart with its text overlay. Returns a navigation request
/// when the user clicked a cube or a label.
pub fn show_chart(
    ui: &mut egui::Ui,
    chart: &ChartState,
    camera: &mut OrbitalCamera,
    theme: &Theme,
) -> Option<ChartAction> {
    let size = ui.available_size().max(egui::vec2(200.0, 150.0));
    let total_rect = ui.allocate_space(size).1;

    let response = ui.interact(total_rect, egui::Id::new("alloy_chart_3d"), egui::Sense::click_and_drag());
    camera.handle_input(&response);

    let painter = ui.painter_at(total_rect);
    let aspect = total_rect.width() / total_rect.height();
    let vp = camera.view_projection(aspect);
    let items = chart.items();
    let unit = chart.unit();

    let line_data = vec![Line3DData {
        segments: floor_grid_segments(),
        color: color_to_f32(theme.grid_color()),
        line_width: 1.0,
    }];

    let ppp = ui.ctx().pixels_per_point();
    let viewport_size = [
        (total_rect.width() * ppp) as u32,
        (total_rect.height() * ppp) as u32,
    ];

    painter.add(create_chart_paint_callback(
        total_rect,
        cube_instances(items),
        line_data,
        camera.uniforms(aspect),
        color_to_f32(theme.plot_bg()),
        viewport_size,
    ));

    let project = |world: Vec3| -> Option<egui::Pos2> {
        let clip = vp * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 0.0 {
            return None; // behind camera
        }
        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
        Some(egui::pos2(
            total_rect.left() + (ndc.x * 0.5 + 0.5) * total_rect.width(),
            total_rect.top() + (-ndc.y * 0.5 + 0.5) * total_rect.height(),
        ))
    };

    draw_axes(&painter, unit, theme, &project);

    if items.is_empty() {
        painter.text(
            total_rect.center(),
            egui::Align2::CENTER_CENTER,
            "No data loaded",
            egui::FontId::proportional(16.0),
            theme.axis_text(),
        );
    }

    // --- Data labels ---
    let label_font = egui::FontId::proportional(11.0);
    let pad = egui::vec2(4.0, 2.0);
    let mut labels: Vec<(usize, egui::Rect, egui::Pos2)> = Vec::new();
    for id in chart.visible_label_ids() {
        let Some(base) = items.base(id) else {
            continue;
        };
        let Some(anchor) = project(world_position(base.position)) else {
            continue;
        };
        let anchor = anchor + egui::vec2(0.0, 6.0);
        let galley = painter.layout_no_wrap(label_title(base).to_string(), label_font.clone(), theme.label_text());
        let rect = egui::Align2::CENTER_TOP.anchor_size(anchor, galley.size() + pad * 2.0);
        if total_rect.intersects(rect) {
            labels.push((id, rect, anchor));
        }
    }

    let pointer = response.hover_pos();
    let hovered_label = pointer.and_then(|p| labels.iter().rev().find(|(_, r, _)| r.contains(p)).map(|(id, _, _)| *id));

    for (id, rect, _) in &labels {
        if Some(*id) == hovered_label {
            continue;
        }
        let Some(base) = items.base(*id) else {
            continue;
        };
        painter.rect_filled(*rect, 2.0, theme.label_fill());
        painter.text(rect.min + pad, egui::Align2::LEFT_TOP, label_title(base), label_font.clone(), theme.label_text());
    }

    if let Some((base, anchor)) = hovered_label.and_then(|id| {
        let anchor = labels.iter().find(|(l, _, _)| *l == id).map(|(_, _, a)| *a)?;
        items.base(id).map(|b| (b, anchor))
    }) {
        let galley = painter.layout_no_wrap(label_details(base, unit), label_font.clone(), theme.label_text());
        let pad = egui::vec2(8.0, 6.0);
        let rect = egui::Align2::CENTER_TOP.anchor_size(anchor, galley.size() + pad * 2.0);
        painter.rect_filled(rect, 3.0, theme.label_fill());
        painter.galley(rect.min + pad, galley, theme.label_text());
    }

    // --- Picking ---
    let pick_at = |pos: egui::Pos2| -> Option<usize> {
        let ndc = Vec2::new(
            (pos.x - total_rect.left()) / total_rect.width() * 2.0 - 1.0,
            -((pos.y - total_rect.top()) / total_rect.height() * 2.0 - 1.0),
        );
        let ray = ray_from_ndc(vp, ndc)?;
        pick_nearest(&ray, pick_boxes(items)).map(|(id, _)| id)
    };

    if hovered_label.is_some() || (!response.dragged() && pointer.and_then(pick_at).is_some()) {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if labels.iter().any(|(_, r, _)| r.contains(pos)) {
                return Some(ChartAction::OpenBrand);
            }
            return pick_at(pos).map(ChartAction::OpenProduct);
        }
    }
    None
}

/// Tick numbers along both floor axes plus the two axis titles.
fn draw_axes(
    painter: &egui::Painter,
    unit: UnitSystem,
    theme: &Theme,
    project: &dyn Fn(Vec3) -> Option<egui::Pos2>,
) {
    let color = theme.axis_text();
    let tick_font = egui::FontId::proportional(10.0);
    let title_font = egui::FontId::proportional(12.0);
    let (hx, hz) = floor_half_extents();
    let (t_lo, t_hi) = unit.tensile_domain();
    let (c_lo, c_hi) = unit.conductivity_domain();

    for v in unit.tensile_ticks() {
        let x = (map_axis(v, t_lo, t_hi, 0.0, 1.0) - 0.5) * GRID_COLUMNS as f64;
        if let Some(pos) = project(world_position([x, 0.0, hz + TENSILE_TICK_OFFSET])) {
            painter.text(pos, egui::Align2::CENTER_CENTER, unit.format_tensile(v), tick_font.clone(), color);
        }
    }

    let mut widest = 0.0_f32;
    for v in unit.conductivity_ticks() {
        let z = (map_axis_inverted(v, c_lo, c_hi, 0.0, 1.0) - 0.5) * GRID_ROWS as f64;
        if let Some(pos) = project(world_position([-hx - CONDUCTIVITY_TICK_OFFSET, 0.0, z])) {
            let rect = painter.text(pos, egui::Align2::RIGHT_CENTER, unit.format_conductivity(v), tick_font.clone(), color);
            widest = widest.max(rect.width());
        }
    }

    if let Some(pos) = project(world_position([0.0, 0.0, TENSILE_TITLE_Z])) {
        painter.text(pos, egui::Align2::CENTER_CENTER, unit.tensile_axis_title(), title_font.clone(), color);
    }

    // Conductivity title reads bottom to top, centred left of the ticks.
    if let Some(anchor) = project(world_position([-hx - CONDUCTIVITY_TICK_OFFSET, 0.0, 0.0])) {
        let galley = painter.layout_no_wrap(unit.conductivity_axis_title().to_string(), title_font, color);
        let size = galley.size();
        let centre = anchor - egui::vec2(widest + 12.0 + size.y / 2.0, 0.0);
        let pos = centre + egui::vec2(-size.y / 2.0, size.x / 2.0);
        painter.add(egui::epaint::TextShape::new(pos, galley, color).with_angle(-FRAC_PI_2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::category::SubProperty;
    use crate::chart::items::{Measurements, StackItem};
    use approx::assert_relative_eq;

    fn items() -> VisualItems {
        VisualItems {
            bases: vec![
                BaseItem {
                    id: 0,
                    category: None,
                    name: "Alloy 1".into(),
                    shortname: String::new(),
                    url: "https://example.com/1".into(),
                    measurements: Measurements {
                        tensile_e: Some(60.0),
                        conductivity_e: Some(25.5),
                        ..Default::default()
                    },
                    color: [255, 0, 0, 255],
                    position: [2.0, BASE_HEIGHT, -1.0],
                    visible: true,
                },
                BaseItem {
                    id: 1,
                    category: None,
                    name: "Hidden".into(),
                    shortname: "H".into(),
                    url: String::new(),
                    measurements: Measurements::default(),
                    color: [0, 255, 0, 255],
                    position: [-2.0, BASE_HEIGHT, 1.0],
                    visible: false,
                },
            ],
            stacks: vec![StackItem {
                base_id: 0,
                property: SubProperty::Formability,
                color: SubProperty::Formability.color(),
                floor: [2.0, -1.0],
                nominal_y: 0.5,
                y: 0.5,
                visible: true,
            }],
        }
    }

    #[test]
    fn instances_cover_visible_cubes_in_world_scale() {
        let instances = cube_instances(&items());
        assert_eq!(instances.len(), 2);
        assert_relative_eq!(instances[0].center[0], 2.0 * SCENE_SCALE);
        assert_relative_eq!(instances[0].half_extents[1], 0.1 * SCENE_SCALE, epsilon = 1e-6);
        assert_relative_eq!(instances[1].center[1], 0.5 * SCENE_SCALE, epsilon = 1e-6);
        assert_relative_eq!(instances[1].half_extents[1], 0.2 * SCENE_SCALE, epsilon = 1e-6);
        assert_eq!(instances[0].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn stack_boxes_resolve_to_their_base() {
        let boxes = pick_boxes(&items());
        assert_eq!(boxes.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![0, 0]);
    }

    #[test]
    fn grid_spans_the_floor() {
        let segments = floor_grid_segments();
        assert_eq!(segments.len(), (GRID_COLUMNS + GRID_ROWS) * 2);
        let xs: Vec<f32> = segments.iter().map(|p| p[0]).collect();
        let max_x = xs.iter().cloned().fold(f32::MIN, f32::max);
        assert_relative_eq!(max_x, 8.0 * SCENE_SCALE, epsilon = 1e-5);
        assert!(segments.iter().all(|p| p[1] == 0.0));
    }

    #[test]
    fn details_list_measurements_with_units() {
        let base = &items().bases[0];
        let text = label_details(base, UnitSystem::English);
        assert_eq!(
            text,
            "Alloy 1\nTensile: 60 ksi\nConductivity: 25.5 % IACS @ 68\u{00B0}F\nCLICK FOR MORE"
        );
        assert!(label_details(base, UnitSystem::Metric).contains("Tensile: n/a MPa"));
        assert_eq!(label_title(base), "Alloy 1");
    }
}
