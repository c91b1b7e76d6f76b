use crate::engine::PointsScale;
use crate::engine::points::DEFAULT_SCALE;

pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "club_championship.db".to_string()),
        }
    }
}

pub struct PointsSettings {
    /// Points for 1st place onwards
    pub scale: Vec<i32>,
}

impl Default for PointsSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE.to_vec(),
        }
    }
}

impl PointsSettings {
    pub fn points_scale(&self) -> PointsScale {
        PointsScale::new(self.scale.clone())
    }
}

pub struct ServerSettings {
    /// Bearer token for lock/unlock; admin routes refuse everything when unset
    pub admin_token: Option<String>,
    /// Name recorded in the audit trail for results posted over HTTP
    pub default_recorder: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            admin_token: std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            default_recorder: "scorer".to_string(),
        }
    }
}

pub struct AppConfig {
    pub database: DatabaseSettings,
    pub points: PointsSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            database: DatabaseSettings::default(),
            points: PointsSettings::default(),
            server: ServerSettings::default(),
        }
    }
}
