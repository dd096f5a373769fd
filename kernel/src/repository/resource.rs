use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{id::ResourceId, resource::Resource};

#[mockall::automock]
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn find_by_id(&self, resource_id: ResourceId) -> AppResult<Option<Resource>>;
}
