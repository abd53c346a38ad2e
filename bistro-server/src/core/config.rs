use std::path::PathBuf;

use crate::utils::AppError;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/bistro | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | GEOHASH_PRECISION | 10 | 存储的 geohash 长度 |
/// | DEFAULT_RADIUS_KM | 2.0 | 邻近搜索默认半径 |
/// | NEARBY_MAX_RESULTS | 100 | 邻近搜索结果上限 |
/// | FEED_CAPACITY | 1024 | 变更广播通道容量 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/bistro HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别 (tracing 过滤表达式)
    pub log_level: String,

    // === 邻近搜索配置 ===
    /// 存储在索引字段上的 geohash 长度
    pub geohash_precision: usize,
    /// 未指定半径时的默认搜索半径 (公里)
    pub default_radius_km: f64,
    /// 单次搜索返回的结果上限
    pub nearby_max_results: usize,

    // === 变更广播配置 ===
    /// broadcast 通道容量，落后的订阅者收到 Lagged
    pub feed_capacity: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/bistro".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            geohash_precision: std::env::var("GEOHASH_PRECISION")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            default_radius_km: std::env::var("DEFAULT_RADIUS_KM")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2.0),
            nearby_max_results: std::env::var("NEARBY_MAX_RESULTS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(100),
            feed_capacity: std::env::var("FEED_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1024),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> Result<(), AppError> {
        for dir in [self.database_dir(), self.log_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::internal(format!("Failed to create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
