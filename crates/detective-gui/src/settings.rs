use detective_graph::{GraphViewConfig, LayoutConfig};
use detective_storage::DatabaseConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "cypher-detective";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub ui_scale: f32,
    pub font_size: f32,
    pub window_width: f32,
    pub window_height: f32,

    pub database: DatabaseConfig,
    pub graph: GraphSettings,

    /// Overrides the platform data directory for the progress file.
    pub progress_file: Option<PathBuf>,

    #[serde(default)]
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// The dark case-file palette.
    #[default]
    Noir,
    Latte,
    Mocha,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub node_radius: f32,
    pub edge_thickness: f32,
    pub edge_tolerance: f32,
    pub layout_iterations: usize,
    pub layout_seed: u64,
    pub layout_padding: f32,
}

impl Default for GraphSettings {
    fn default() -> Self {
        let view = GraphViewConfig::default();
        Self {
            min_zoom: view.min_zoom,
            max_zoom: view.max_zoom,
            node_radius: view.node_radius,
            edge_thickness: view.edge_thickness,
            edge_tolerance: view.edge_tolerance,
            layout_iterations: view.layout.iterations,
            layout_seed: view.layout.seed,
            layout_padding: view.layout.padding,
        }
    }
}

impl GraphSettings {
    pub fn view_config(&self) -> GraphViewConfig {
        GraphViewConfig {
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            node_radius: self.node_radius,
            edge_thickness: self.edge_thickness,
            edge_tolerance: self.edge_tolerance,
            layout: LayoutConfig {
                iterations: self.layout_iterations,
                seed: self.layout_seed,
                padding: self.layout_padding,
                ..LayoutConfig::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub show_level_completed: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_level_completed: true,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Noir,
            ui_scale: 1.0,
            font_size: 14.0,
            window_width: 1200.0,
            window_height: 800.0,
            database: DatabaseConfig::default(),
            graph: GraphSettings::default(),
            progress_file: None,
            notifications: NotificationSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Settings file plus `CYPHER_DETECTIVE_DB_*` overrides.
    pub fn load() -> Self {
        let mut settings = Self::path().map(Self::load_from).unwrap_or_default();
        settings.database = settings.database.with_env_overrides();
        settings
    }

    pub fn load_from(path: PathBuf) -> Self {
        tracing::info!("Loading settings from {:?}", path);
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => return settings,
                Err(e) => tracing::error!("Failed to parse settings: {}", e),
            },
            Err(e) => tracing::error!("Failed to read settings file: {}", e),
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &std::path::Path) {
        if let Some(dir) = path.parent()
            && let Err(e) = std::fs::create_dir_all(dir)
        {
            tracing::warn!("Failed to create settings directory: {}", e);
            return;
        }
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = std::fs::write(path, content) {
                    tracing::warn!("Failed to write settings: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize settings: {}", e),
        }
    }
}
