pub mod category_normalizer;
pub mod field_resolver;
pub mod image_extractor;
pub mod product_normalizer;
pub mod row_sampler;
pub mod value_coercer;

pub use category_normalizer::*;
pub use field_resolver::*;
pub use image_extractor::*;
pub use product_normalizer::*;
pub use row_sampler::*;
pub use value_coercer::*;
