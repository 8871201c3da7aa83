use crate::domain::model::{OutputDocument, RawInterval};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 寫入後讀者看到的完整路徑
    fn location(&self, path: &str) -> String;
}

/// 價格來源。任何失敗（HTTP 狀態、逾時、JSON 格式）都回傳 `None`，不向上拋出
pub trait PriceSource: Send + Sync {
    fn fetch_json(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Option<serde_json::Value>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawInterval>>;
    async fn transform(&self, data: Vec<RawInterval>) -> Result<OutputDocument>;
    async fn load(&self, document: OutputDocument) -> Result<String>;
}
