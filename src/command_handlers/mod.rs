pub mod create;
pub mod describe;
pub mod dispatch;
pub mod list;
pub mod remove;
