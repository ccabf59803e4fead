//! Filesystem persistence for the calq client: platform paths, the
//! cached-profile store, and configuration loading.

pub mod config_storage;
pub mod paths;
pub mod profile_cache;

pub use config_storage::ConfigStorage;
pub use paths::CalqPaths;
pub use profile_cache::ProfileCache;
