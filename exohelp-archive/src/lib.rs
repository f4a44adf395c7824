//! exohelp archive: cached access to public exoplanet tables.
//!
//! Two loaders share one policy: reuse the newest local CSV snapshot when
//! caching is requested, otherwise download, normalize, persist and return.
//! - [`ConfirmedExoplanetLoader`]: the confirmed-planet catalog, one dated
//!   snapshot per retrieval day
//! - [`SolarSystemPlanetLoader`]: the solar-system reference table, one
//!   fixed-name snapshot

pub mod config;
pub mod confirmed;
pub mod solar_system;

pub use config::{ArchiveConfig, ConfigError};
pub use confirmed::ConfirmedExoplanetLoader;
pub use solar_system::SolarSystemPlanetLoader;

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<ConfirmedExoplanetLoader>();
        require_sync::<ConfirmedExoplanetLoader>();
        require_send::<SolarSystemPlanetLoader>();
        require_sync::<SolarSystemPlanetLoader>();
        require_send::<ArchiveConfig>();
        require_sync::<ArchiveConfig>();
    }
}
