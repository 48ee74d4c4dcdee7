pub mod config;
pub mod logging;

pub mod control;
pub mod digest;
pub mod fetch;
pub mod manifest;
pub mod retry;
pub mod storage;
