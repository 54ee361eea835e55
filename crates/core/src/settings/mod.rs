mod in_memory;
mod settings_traits;

pub use in_memory::InMemoryRateSettings;
pub use settings_traits::RateSettingsRepositoryTrait;
