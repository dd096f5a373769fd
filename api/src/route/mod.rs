pub mod appointment;
pub mod health;
pub mod resource;
pub mod v1;
