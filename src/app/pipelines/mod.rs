pub mod spot_price_pipeline;

pub use spot_price_pipeline::SpotPricePipeline;
