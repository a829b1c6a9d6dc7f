use serde::{Deserialize, Serialize};

use crate::layouts::FruchtermanReingoldState;

/// Smallest summary that still has room for the exact `0` and `1` bins plus one range.
pub const MIN_SUMMARY_BINS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsLayout {
    /// Side of the square new nodes are spawned in when no placed neighbour exists
    pub spawn_size: f32,

    /// Max offset from a placed neighbour when spawning next to it
    pub spawn_jitter: f32,

    /// Parameters of the force simulation step
    pub force: FruchtermanReingoldState,
}

impl Default for SettingsLayout {
    fn default() -> Self {
        Self {
            spawn_size: 250.,
            spawn_jitter: 30.,
            force: FruchtermanReingoldState::default(),
        }
    }
}

impl SettingsLayout {
    pub fn with_spawn_size(mut self, spawn_size: f32) -> Self {
        self.spawn_size = spawn_size;
        self
    }

    pub fn with_spawn_jitter(mut self, spawn_jitter: f32) -> Self {
        self.spawn_jitter = spawn_jitter;
        self
    }

    pub fn with_force(mut self, force: FruchtermanReingoldState) -> Self {
        self.force = force;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsStats {
    /// Upper bound of bins in a distribution summary. Values below [`MIN_SUMMARY_BINS`] are
    /// raised to it.
    pub max_summary_bins: usize,
}

impl Default for SettingsStats {
    fn default() -> Self {
        Self {
            max_summary_bins: 10,
        }
    }
}

impl SettingsStats {
    pub fn with_max_summary_bins(mut self, max_summary_bins: usize) -> Self {
        self.max_summary_bins = max_summary_bins;
        self
    }

    pub(crate) fn summary_bins(&self) -> usize {
        self.max_summary_bins.max(MIN_SUMMARY_BINS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPath {
    /// Radius of a class glyph in the path diagram
    pub node_radius: f32,

    /// Gap between neighbouring class glyphs
    pub node_padding: f32,
}

impl Default for SettingsPath {
    fn default() -> Self {
        Self {
            node_radius: 20.,
            node_padding: 50.,
        }
    }
}

impl SettingsPath {
    pub fn with_node_radius(mut self, node_radius: f32) -> Self {
        self.node_radius = node_radius;
        self
    }

    pub fn with_node_padding(mut self, node_padding: f32) -> Self {
        self.node_padding = node_padding;
        self
    }

    /// Distance between centres of two neighbouring slots.
    pub(crate) fn step(&self) -> f32 {
        self.node_padding + 2. * self.node_radius
    }
}

/// All tunables of the crate. Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: SettingsLayout,
    pub stats: SettingsStats,
    pub path: SettingsPath,
}

impl Settings {
    /// Parses settings from JSON.
    ///
    /// # Errors
    /// Returns [`crate::Error::Serialization`] when the document is malformed.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
