pub mod controls;
pub mod datatable;
pub mod metrics;
