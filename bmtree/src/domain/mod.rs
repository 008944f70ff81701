pub mod bookmark;
pub mod entry;
pub mod error;
pub mod favicon;
pub mod folder;
pub mod path;
pub mod repositories;
pub mod services;
