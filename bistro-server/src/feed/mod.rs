//! Change Feed
//!
//! 显式订阅抽象：桌台 / 预订 / 餐厅文档变更通过广播通道推送给所有
//! 订阅者，取代隐式回调监听。订阅者 drop 掉接收端即确定性退订。
//!
//! 投递语义：最终一致，跨资源不保证顺序；落后的订阅者收到 `Lagged`
//! 后应重新读取快照再继续消费。发布端从不阻塞、从不让写入失败。

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default broadcast channel capacity
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

/// One document change notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Resource type ("restaurant", "dining_table", "booking")
    pub resource: String,
    /// Change type ("created", "updated", "deleted", "cleared")
    pub action: String,
    /// Record id in "table:id" form
    pub id: String,
    /// Per-resource monotonically increasing version
    pub version: u64,
    /// Resource data (None for deletions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// 资源版本管理器
///
/// 每种资源类型维护独立的版本号，支持原子递增；
/// 客户端用版本号判断数据新旧。
#[derive(Debug, Default)]
struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 递增指定资源的版本号并返回新值
    fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }
}

/// Broadcast hub for document change events
#[derive(Debug)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
    versions: ResourceVersions,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            versions: ResourceVersions::default(),
        }
    }

    /// Subscribe to all subsequent change events.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish a change notification.
    ///
    /// 没有订阅者时发送失败是正常情况，不影响写入方。
    pub fn publish<T: Serialize>(&self, resource: &str, action: &str, id: &str, data: Option<&T>) {
        let version = self.versions.increment(resource);
        let event = ChangeEvent {
            resource: resource.to_string(),
            action: action.to_string(),
            id: id.to_string(),
            version,
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        let _ = self.tx.send(event);
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_in_order_per_resource() {
        let feed = ChangeFeed::new(16);
        let mut rx = feed.subscribe();

        feed.publish("dining_table", "updated", "dining_table:t1", Some(&"a"));
        feed.publish("dining_table", "updated", "dining_table:t1", Some(&"b"));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(first.resource, "dining_table");
    }

    #[tokio::test]
    async fn versions_are_independent_per_resource() {
        let feed = ChangeFeed::new(16);
        let mut rx = feed.subscribe();

        feed.publish::<()>("booking", "created", "booking:b1", None);
        feed.publish::<()>("dining_table", "updated", "dining_table:t1", None);

        assert_eq!(rx.recv().await.unwrap().version, 1);
        assert_eq!(rx.recv().await.unwrap().version, 1);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let feed = ChangeFeed::new(16);
        feed.publish::<()>("booking", "created", "booking:b1", None);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn dropped_receiver_unsubscribes() {
        let feed = ChangeFeed::new(16);
        let rx = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);
        drop(rx);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
