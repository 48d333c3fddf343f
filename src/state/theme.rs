use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(24, 24, 28),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    /// Floor grid line color.
    pub fn grid_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(90, 90, 96),
            Theme::Light => Color32::from_rgb(190, 190, 190),
        }
    }

    /// Tick numbers and axis titles.
    pub fn axis_text(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(170, 170, 170),
            Theme::Light => Color32::from_rgb(0x99, 0x99, 0x99),
        }
    }

    /// Background of the data-label boxes.
    pub fn label_fill(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(60, 60, 64),
            Theme::Light => Color32::from_rgb(0xd5, 0xd5, 0xd5),
        }
    }

    pub fn label_text(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(235, 235, 235),
            Theme::Light => Color32::from_rgb(40, 40, 40),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}
