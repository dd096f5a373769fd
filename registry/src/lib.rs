use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::{
    appointment::AppointmentRepositoryImpl, health::HealthCheckRepositoryImpl,
    resource::ResourceRepositoryImpl, slot::SlotHoldRepositoryImpl,
};
use kernel::repository::appointment::AppointmentRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::resource::ResourceRepository;
use kernel::repository::slot::SlotHoldRepository;
use shared::config::{AppConfig, SchedulerConfig};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    resource_repository: Arc<dyn ResourceRepository>,
    appointment_repository: Arc<dyn AppointmentRepository>,
    slot_hold_repository: Arc<dyn SlotHoldRepository>,
    scheduler_config: SchedulerConfig,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: &AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let resource_repository = Arc::new(ResourceRepositoryImpl::new(pool.clone()));
        let appointment_repository = Arc::new(AppointmentRepositoryImpl::new(pool.clone()));
        let slot_hold_repository = Arc::new(SlotHoldRepositoryImpl::new(pool.clone()));
        Self {
            health_check_repository,
            resource_repository,
            appointment_repository,
            slot_hold_repository,
            scheduler_config: app_config.scheduler,
        }
    }

    // ハンドラのテストでモックリポジトリを差し込むための組み立て口
    pub fn from_parts(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        resource_repository: Arc<dyn ResourceRepository>,
        appointment_repository: Arc<dyn AppointmentRepository>,
        slot_hold_repository: Arc<dyn SlotHoldRepository>,
        scheduler_config: SchedulerConfig,
    ) -> Self {
        Self {
            health_check_repository,
            resource_repository,
            appointment_repository,
            slot_hold_repository,
            scheduler_config,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn resource_repository(&self) -> Arc<dyn ResourceRepository> {
        self.resource_repository.clone()
    }

    pub fn appointment_repository(&self) -> Arc<dyn AppointmentRepository> {
        self.appointment_repository.clone()
    }

    pub fn slot_hold_repository(&self) -> Arc<dyn SlotHoldRepository> {
        self.slot_hold_repository.clone()
    }

    pub fn scheduler_config(&self) -> &SchedulerConfig {
        &self.scheduler_config
    }
}
