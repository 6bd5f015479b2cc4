pub mod brand;
pub mod communication;
pub mod contact;
pub mod deal;
pub mod document;
pub mod task;
