//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅管理与邻近搜索
//! - [`tables`] - 桌台操作 (预订/清台/删除)
//! - [`bookings`] - 预订取消
//! - [`queue`] - 用户排队视图

pub mod bookings;
pub mod health;
pub mod queue;
pub mod restaurants;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
