pub mod document;
pub mod editor;
pub mod import;
pub mod logging;
pub mod mention;
pub mod render;
pub mod serialize;
pub mod theme;
