//! Service configuration.

mod settings;
pub use settings::{AuthMode, Settings, StoreBackend};
