//! 统计聚合器
//!
//! 以会话为单位收集请求记录，维护运行统计并提供分组查询。

use crate::telemetry::observer::RecordObserver;
use crate::telemetry::types::{AggregateStats, MethodStats, RequestRecord, SessionSummary};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 会话状态
///
/// 全部会话数据放在同一把锁之后：一次 `record()` 的
/// 追加、计数、求和与均值更新对读取方是单个原子单元。
#[derive(Default)]
struct SessionState {
    active: bool,
    records: Vec<RequestRecord>,
    stats: AggregateStats,
}

/// 统计聚合器
///
/// 管理一个由 `start()`/`stop()` 界定的记录会话。每个实例独立可构造、
/// 可测试，不依赖任何进程级全局状态；跨任务共享时包一层 `Arc` 即可，
/// 所有操作只需 `&self`。
///
/// 完成的请求由传输层归一化为 [`RequestRecord`] 后喂入 `record()`；
/// 聚合器自身不做 I/O，也没有内部错误类型——空会话、空桶等边界
/// 情况一律退化为零值或空序列。
pub struct StatsAggregator {
    state: RwLock<SessionState>,
    observers: RwLock<Vec<Arc<dyn RecordObserver>>>,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    /// 创建新的聚合器，初始为非活动状态
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// 注册记录观察者
    ///
    /// 观察者在每条被接受的记录之后、锁外被调用，属于旁路副作用，
    /// 不参与聚合契约。
    pub fn add_observer(&self, observer: Arc<dyn RecordObserver>) {
        self.observers.write().push(observer);
    }

    /// 开始新会话
    ///
    /// 清空记录、归零统计并进入活动状态。重新开始会话会丢弃
    /// 上一个会话的全部记录。
    pub fn start(&self) {
        let mut state = self.state.write();
        state.active = true;
        state.records.clear();
        state.stats = AggregateStats::default();
    }

    /// 结束会话并返回冻结快照
    ///
    /// 幂等：已处于非活动状态时再次调用不改变统计，返回同一份快照。
    pub fn stop(&self) -> SessionSummary {
        let mut state = self.state.write();
        state.active = false;
        SessionSummary {
            stats: state.stats.clone(),
            records: state.records.clone(),
        }
    }

    /// 记录一条完成的请求
    ///
    /// 非活动状态下直接丢弃（不入队、不计数）。
    pub fn record(&self, entry: RequestRecord) {
        {
            let mut state = self.state.write();
            if !state.active {
                return;
            }
            state.stats.apply(&entry);
            state.records.push(entry.clone());
        }

        // 通知在锁外进行，观察者可以安全地回读统计
        for observer in self.observers.read().iter() {
            observer.on_record(&entry);
        }
    }

    /// 当前聚合统计的快照
    ///
    /// 纯读取，活动中与 `stop()` 之后语义相同。
    pub fn summarize(&self) -> AggregateStats {
        self.state.read().stats.clone()
    }

    /// 按 HTTP 方法分组统计
    ///
    /// 返回首次出现顺序的映射，对固定输入输出稳定。
    pub fn breakdown_by_method(&self) -> IndexMap<String, MethodStats> {
        let state = self.state.read();
        let mut buckets: IndexMap<String, MethodStats> = IndexMap::new();

        for record in &state.records {
            let bucket = buckets.entry(record.method.clone()).or_default();
            bucket.count += 1;
            bucket.total_latency_ms += record.latency_ms;
        }

        for bucket in buckets.values_mut() {
            bucket.average_latency_ms = bucket.total_latency_ms as f64 / bucket.count as f64;
        }

        buckets
    }

    /// 按状态段分组计数
    ///
    /// 键为百位桶（0、100、200、300、400、500），哨兵值 0 归入 0 段，
    /// 表示连接级失败。各段计数之和等于总请求数。
    pub fn breakdown_by_status_class(&self) -> BTreeMap<u16, u64> {
        let state = self.state.read();
        let mut buckets: BTreeMap<u16, u64> = BTreeMap::new();

        for record in &state.records {
            *buckets.entry(record.status_class()).or_default() += 1;
        }

        buckets
    }

    /// 延迟最大的 `n` 条记录，按延迟降序
    ///
    /// 记录不足 `n` 条时返回全部；延迟相同的记录保持原始记录顺序
    /// （稳定排序）；`n = 0` 返回空序列。
    pub fn slowest(&self, n: usize) -> Vec<RequestRecord> {
        let mut records = self.state.read().records.clone();
        records.sort_by(|a, b| b.latency_ms.cmp(&a.latency_ms));
        records.truncate(n);
        records
    }

    /// 会话时长（毫秒）
    ///
    /// 首末两条记录时间戳之差的墙钟跨度。并发请求重叠时该值可以
    /// 小于各请求延迟之和。无记录时为 0。
    pub fn session_duration_ms(&self) -> u64 {
        let state = self.state.read();
        match (state.records.first(), state.records.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp - first.timestamp).num_milliseconds().max(0) as u64
            }
            _ => 0,
        }
    }

    /// 会话内全部记录的副本
    pub fn records(&self) -> Vec<RequestRecord> {
        self.state.read().records.clone()
    }

    /// 会话是否处于活动状态
    pub fn is_active(&self) -> bool {
        self.state.read().active
    }

    /// 当前记录条数
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// 会话是否没有任何记录
    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }
}
