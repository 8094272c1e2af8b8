pub mod aggregator;
pub mod classifier;
pub mod etl;
pub mod pipeline;
pub mod ranker;
pub mod registry;
pub mod resolver;

pub use crate::domain::model::{Report, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
