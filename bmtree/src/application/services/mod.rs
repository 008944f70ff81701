pub mod tree_service;
pub mod tree_service_impl;
