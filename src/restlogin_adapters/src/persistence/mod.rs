pub mod in_memory_authority;

pub use in_memory_authority::{InMemoryAuthority, UserRegistryError};
