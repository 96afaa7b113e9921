//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_permission_authority;
mod in_memory_actor_record_cache;
mod static_permission_authority;

pub use http_permission_authority::HttpPermissionAuthority;
pub use in_memory_actor_record_cache::InMemoryActorRecordCache;
pub use static_permission_authority::StaticPermissionAuthority;
