pub mod item;
pub mod maintenance;
