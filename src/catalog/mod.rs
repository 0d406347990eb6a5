pub mod pitch;
pub mod scales;
