pub mod di;
pub(crate) mod http;
pub mod repositories;
