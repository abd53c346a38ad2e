use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{BookingRepository, RestaurantRepository, TableRepository};
use crate::feed::ChangeFeed;
use crate::queue::QueueView;
use crate::reservation::ReservationManager;
use crate::search::ProximitySearchService;
use crate::utils::AppError;

/// 服务器状态 - 所有处理器共享的引用
///
/// 数据库句柄和变更广播是唯一的长生命周期资源；仓储和服务都是
/// 围绕句柄的轻量包装，处理器按需构造。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | feed | Arc<ChangeFeed> | 文档变更广播 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 文档变更广播
    pub feed: Arc<ChangeFeed>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替；
    /// 测试中用已打开的数据库直接构造。
    pub fn new(config: Config, db: Surreal<Db>, feed: Arc<ChangeFeed>) -> Self {
        Self { config, db, feed }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/bistro.db，含表和索引定义)
    /// 3. 变更广播通道
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("bistro.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let feed = Arc::new(ChangeFeed::new(config.feed_capacity));
        Ok(Self::new(config.clone(), db_service.db, feed))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 餐厅仓储 (绑定配置的 geohash 精度)
    pub fn restaurants(&self) -> RestaurantRepository {
        RestaurantRepository::new(self.db.clone(), self.config.geohash_precision)
    }

    /// 桌台仓储
    pub fn tables(&self) -> TableRepository {
        TableRepository::new(self.db.clone())
    }

    /// 预订仓储 (只读侧)
    pub fn bookings(&self) -> BookingRepository {
        BookingRepository::new(self.db.clone())
    }

    /// 邻近搜索服务
    pub fn search(&self) -> ProximitySearchService {
        ProximitySearchService::new(
            self.db.clone(),
            self.config.geohash_precision,
            self.config.default_radius_km,
            self.config.nearby_max_results,
        )
    }

    /// 预订状态机
    pub fn reservations(&self) -> ReservationManager {
        ReservationManager::new(self.db.clone())
    }

    /// 排队视图
    pub fn queue(&self) -> QueueView {
        QueueView::new(self.db.clone())
    }

    /// 广播资源变更通知
    ///
    /// 版本号由 ChangeFeed 按资源类型自动递增。
    ///
    /// # 参数
    /// - `resource`: 资源类型 ("restaurant", "dining_table", "booking")
    /// - `action`: 变更类型 ("created", "updated", "deleted")
    /// - `id`: 资源 ID
    /// - `data`: 资源数据 (deleted 时为 None)
    pub fn broadcast_change<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        self.feed.publish(resource, action, id, data);
    }
}
