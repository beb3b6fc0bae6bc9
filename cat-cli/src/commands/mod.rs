pub mod check;
pub mod logs;
pub mod start;
