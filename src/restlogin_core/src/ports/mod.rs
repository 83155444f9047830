pub mod authority;
pub mod session;
