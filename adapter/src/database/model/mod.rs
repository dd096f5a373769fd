pub mod appointment;
pub mod resource;
pub mod slot;
