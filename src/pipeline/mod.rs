pub mod builder;
pub mod cache;
pub mod model_runtime;
pub mod runtime;
pub mod traits;
