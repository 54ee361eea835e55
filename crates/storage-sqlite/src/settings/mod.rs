//! SQLite storage implementation for settings.

mod model;
mod repository;

pub use model::AppSettingDB;
pub use repository::RateSettingsRepository;

// Re-export trait from core for convenience
pub use ratefeed_core::settings::RateSettingsRepositoryTrait;
