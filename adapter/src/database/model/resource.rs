use kernel::model::{
    id::{BranchId, ResourceId},
    resource::Resource,
};

#[derive(sqlx::FromRow)]
pub struct ResourceRow {
    pub resource_id: ResourceId,
    pub branch_id: BranchId,
    pub resource_name: String,
    pub active: bool,
    pub appointment_active: bool,
    pub online_appointment_active: bool,
    pub is_deleted: bool,
}

impl From<ResourceRow> for Resource {
    fn from(value: ResourceRow) -> Self {
        let ResourceRow {
            resource_id,
            branch_id,
            resource_name,
            active,
            appointment_active,
            online_appointment_active,
            is_deleted,
        } = value;
        Resource {
            resource_id,
            branch_id,
            resource_name,
            active,
            appointment_active,
            online_appointment_active,
            is_deleted,
        }
    }
}
