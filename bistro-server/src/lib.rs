//! Bistro Server - 基于位置的餐厅发现与排他桌台预订服务
//!
//! # 架构概述
//!
//! - **地理计算** (`geo`): geohash 编解码、haversine 距离、范围规划 (纯函数)
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储，仓储显式注入
//! - **搜索** (`search`): 半径搜索 = 索引范围扫描 + 距离后置过滤
//! - **预订** (`reservation`): 桌台状态机，事务内 CAS 保证排他
//! - **排队** (`queue`): 用户预订的只读投影
//! - **变更广播** (`feed`): 显式订阅的文档变更通知
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! bistro-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── geo/           # 地理计算 (无 I/O)
//! ├── db/            # 数据库层 (模型 + 仓储)
//! ├── search/        # 邻近搜索服务
//! ├── reservation/   # 预订状态机
//! ├── queue/         # 排队视图
//! ├── feed/          # 变更广播
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod feed;
pub mod geo;
pub mod queue;
pub mod reservation;
pub mod search;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use feed::{ChangeEvent, ChangeFeed};
pub use queue::QueueView;
pub use reservation::{ReservationError, ReservationManager};
pub use search::{NearbyQuery, ProximitySearchService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
