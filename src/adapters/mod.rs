// Adapters layer: concrete implementations for external systems (registry, git, storage, html).

pub mod git_source;
pub mod html;
pub mod registry_source;
pub mod storage;
