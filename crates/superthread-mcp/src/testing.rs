use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;
use superthread_core::{ApiClient, ApiRequest, Result};

mock! {
    pub Api {}

    #[async_trait]
    impl ApiClient for Api {
        async fn request(&self, request: ApiRequest, token: &str) -> Result<Option<Value>>;
    }
}
