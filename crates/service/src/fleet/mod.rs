//! Fleet service: employees, carriages, trains and their maintenance windows.

pub mod carriage;
pub mod employee;
pub mod maintenance;
pub mod train;
