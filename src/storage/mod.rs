pub mod catalog_writer;

pub use catalog_writer::*;
