pub mod programs;
pub mod schedule;
