pub mod appointment;
pub mod id;
pub mod interval;
pub mod resource;
pub mod slot;
