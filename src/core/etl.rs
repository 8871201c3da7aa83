use crate::core::{OutputDocument, Pipeline};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 完整執行一次；文件在記憶體中組好後才寫出
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting spot price conversion...");

        let document = self.preview().await?;

        tracing::info!("Loading data...");
        let output_path = self.pipeline.load(document).await?;

        Ok(output_path)
    }

    /// Extract + transform，不寫入任何檔案
    pub async fn preview(&self) -> Result<OutputDocument> {
        tracing::info!("Extracting data...");
        let raw_data = self.pipeline.extract().await?;

        tracing::info!("Transforming {} records...", raw_data.len());
        let document = self.pipeline.transform(raw_data).await?;

        Ok(document)
    }
}
