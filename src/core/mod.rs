pub mod archive;
pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{PriceApiResponse, Snapshot};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
