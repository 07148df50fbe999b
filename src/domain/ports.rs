use crate::domain::model::{PriceApiResponse, Snapshot};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn list_dirs(&self, path: &str)
        -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn token_endpoint(&self) -> &str;
    fn prices_endpoint(&self) -> &str;
    fn authorization(&self) -> Option<&str>;
    fn api_key(&self) -> Option<&str>;
    fn states(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<PriceApiResponse>;
    async fn transform(&self, raw: PriceApiResponse) -> Result<Snapshot>;
    async fn load(&self, snapshot: Snapshot) -> Result<String>;
}
