pub mod dataset_fetcher;
pub mod table_loader;

pub use dataset_fetcher::*;
pub use table_loader::*;
