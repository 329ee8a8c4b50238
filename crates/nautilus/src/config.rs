use crate::node::Node;
use nautilus_geom::SimulationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Visual constants that influence sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizationStyles {
    pub node_font_size: f64,
    pub circle_padding: f64,
    /// Average glyph width as a fraction of the font size.
    pub char_width_factor: f64,
}

impl Default for VisualizationStyles {
    fn default() -> Self {
        Self {
            node_font_size: 10.0,
            circle_padding: 1.0,
            char_width_factor: 0.6,
        }
    }
}

impl VisualizationStyles {
    pub fn text_width(&self, text: &str) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.node_font_size * self.char_width_factor
    }

    /// Radius that fits the node's label. Nodes with children reserve one extra line so the
    /// label does not collide with nested circles.
    pub fn default_radius(&self, node: &Node) -> f64 {
        let r = self.text_width(node.name()) / 2.0 + self.circle_padding;
        if node.original_children().is_empty() {
            r
        } else {
            r + self.node_font_size
        }
    }

    pub fn default_radius_for_node_with_one_child(&self, node: &Node, child_radius: f64) -> f64 {
        self.default_radius(node)
            .max(child_radius + self.node_font_size + self.circle_padding)
    }
}

/// Tuning of the force placement phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub link_alpha_decay: f64,
    /// Collisions cool slower than links, so they keep separating circles after the links have
    /// settled.
    pub collide_alpha_decay: f64,
    pub alpha_min: f64,
    pub velocity_decay: f64,
    pub intermediate_update_interval_ms: u64,
    pub random_seed: u64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            link_alpha_decay: 0.06,
            collide_alpha_decay: 0.02,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            intermediate_update_interval_ms: 100,
            random_seed: 1,
        }
    }
}

impl LayoutOptions {
    pub fn link_params(&self) -> SimulationParams {
        self.params(self.link_alpha_decay)
    }

    pub fn collide_params(&self) -> SimulationParams {
        self.params(self.collide_alpha_decay)
    }

    pub fn intermediate_update_interval(&self) -> Duration {
        Duration::from_millis(self.intermediate_update_interval_ms)
    }

    fn params(&self, alpha_decay: f64) -> SimulationParams {
        SimulationParams {
            alpha_min: self.alpha_min,
            alpha_decay,
            velocity_decay: self.velocity_decay,
            random_seed: self.random_seed,
            ..SimulationParams::default()
        }
    }
}
