pub mod etl;

pub use crate::domain::model::{NormalizedInterval, OutputDocument, PricedInterval, RawInterval};
pub use crate::domain::ports::{Pipeline, PriceSource, Storage};
pub use crate::utils::error::Result;
