pub mod audit;
pub mod dispatch;
pub mod incidents;
pub mod maintenance;
pub mod offices;
pub mod records;
pub mod shared;
