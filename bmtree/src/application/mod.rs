// bmtree/src/application/mod.rs
pub mod error;
pub mod services;

pub use services::tree_service_impl::TreeServiceImpl;
