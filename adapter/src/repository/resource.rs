use async_trait::async_trait;
use derive_new::new;
use kernel::model::{id::ResourceId, resource::Resource};
use kernel::repository::resource::ResourceRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::resource::ResourceRow, ConnectionPool};

#[derive(new)]
pub struct ResourceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ResourceRepository for ResourceRepositoryImpl {
    async fn find_by_id(&self, resource_id: ResourceId) -> AppResult<Option<Resource>> {
        // 論理削除済みの行も返す。予約可否の判定は kernel 側の
        // is_bookable に一元化してあり、ここでは絞り込まない。
        let row: Option<ResourceRow> = sqlx::query_as(
            r#"
                SELECT
                    resource_id,
                    branch_id,
                    resource_name,
                    active,
                    appointment_active,
                    online_appointment_active,
                    is_deleted
                FROM resources
                WHERE resource_id = $1
            "#,
        )
        .bind(resource_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Resource::from))
    }
}
