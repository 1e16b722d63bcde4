//! 端点处理模块

mod api;

pub use api::{echo, health, index, not_found, server_info, time, ApiError};
