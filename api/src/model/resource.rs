use kernel::model::{id::ResourceId, resource::Resource};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummaryResponse {
    pub id: ResourceId,
    pub name: String,
}

impl From<Resource> for ResourceSummaryResponse {
    fn from(value: Resource) -> Self {
        Self {
            id: value.resource_id,
            name: value.resource_name,
        }
    }
}
