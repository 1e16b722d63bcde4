//! 遥测类型定义
//!
//! 定义请求记录、聚合统计等核心类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 请求记录
///
/// 记录单个已完成请求的结果，包括时间戳、方法、目标、状态码和延迟。
/// 记录一旦创建即不可变，由传输层在请求结束时构造。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    /// 记录时间戳
    pub timestamp: DateTime<Utc>,
    /// HTTP 方法（自由格式字符串）
    pub method: String,
    /// 请求目标（URL 或路径）
    pub target: String,
    /// HTTP 状态码，`0` 为保留哨兵值，表示未收到任何响应（连接错误或超时）
    pub status_code: u16,
    /// 请求耗时（毫秒），从发起到完成
    pub latency_ms: u64,
    /// 响应体大小（字节），无响应体时为 0
    pub bytes: u64,
    /// 错误信息，仅在未收到状态码时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestRecord {
    /// 创建一条已收到响应的记录（任意状态码，包括 4xx/5xx）
    pub fn completed(
        method: impl Into<String>,
        target: impl Into<String>,
        status_code: u16,
        latency_ms: u64,
        bytes: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            method: method.into(),
            target: target.into(),
            status_code,
            latency_ms,
            bytes,
            error: None,
        }
    }

    /// 创建一条未收到响应的记录（连接错误或超时）
    ///
    /// 状态码固定为哨兵值 `0`，错误信息必填。
    pub fn failed(
        method: impl Into<String>,
        target: impl Into<String>,
        latency_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            method: method.into(),
            target: target.into(),
            status_code: 0,
            latency_ms,
            bytes: 0,
            error: Some(error.into()),
        }
    }

    /// 覆盖记录时间戳（主要用于测试中构造确定性的会话时长）
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// 检查请求是否成功（状态码在 [200, 300) 区间）
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// 状态码所属的状态段（百位桶）
    ///
    /// 例如 404 → 400，502 → 500；哨兵值 0 → 0（连接级失败）。
    pub fn status_class(&self) -> u16 {
        self.status_code / 100 * 100
    }
}

/// 聚合统计
///
/// 由记录序列推导的运行计数。平均延迟始终由运行总和与计数重新计算，
/// 不单独维护。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// 总请求数
    pub total_requests: u64,
    /// 成功请求数（状态码在 [200, 300) 区间）
    pub successful_requests: u64,
    /// 失败请求数（其余所有状态，包括哨兵值 0）
    pub failed_requests: u64,
    /// 延迟总和（毫秒）
    pub total_latency_ms: u64,
    /// 平均延迟（毫秒），无请求时为 0
    pub average_latency_ms: f64,
}

impl AggregateStats {
    /// 将一条记录计入统计
    ///
    /// 计数、总和与平均值在同一次更新中完成，保证读取方
    /// 不会观察到二者不一致的中间状态。
    pub(crate) fn apply(&mut self, record: &RequestRecord) {
        self.total_requests += 1;
        self.total_latency_ms += record.latency_ms;
        self.average_latency_ms = self.total_latency_ms as f64 / self.total_requests as f64;

        if record.is_success() {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
    }

    /// 成功率（0.0 - 1.0），无请求时为 0
    pub fn success_rate(&self) -> f64 {
        if self.total_requests > 0 {
            self.successful_requests as f64 / self.total_requests as f64
        } else {
            0.0
        }
    }
}

/// 单个 HTTP 方法的统计桶
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodStats {
    /// 该方法的请求数
    pub count: u64,
    /// 该方法的延迟总和（毫秒）
    pub total_latency_ms: u64,
    /// 该方法的平均延迟（毫秒），桶为空时为 0
    pub average_latency_ms: f64,
}

/// 会话摘要
///
/// `stop()` 返回的冻结快照：最终统计加完整记录序列。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// 最终聚合统计
    pub stats: AggregateStats,
    /// 会话内的全部记录，按记录顺序排列
    pub records: Vec<RequestRecord>,
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_completed_record() {
        let record = RequestRecord::completed("GET", "/api/health", 200, 50, 128);

        assert_eq!(record.method, "GET");
        assert_eq!(record.target, "/api/health");
        assert_eq!(record.status_code, 200);
        assert_eq!(record.latency_ms, 50);
        assert_eq!(record.bytes, 128);
        assert!(record.error.is_none());
        assert!(record.is_success());
    }

    #[test]
    fn test_failed_record_uses_sentinel_status() {
        let record = RequestRecord::failed("POST", "http://127.0.0.1:9999/", 20, "timeout");

        assert_eq!(record.status_code, 0);
        assert_eq!(record.bytes, 0);
        assert_eq!(record.error.as_deref(), Some("timeout"));
        assert!(!record.is_success());
    }

    #[test]
    fn test_status_class() {
        assert_eq!(RequestRecord::completed("GET", "/", 200, 1, 0).status_class(), 200);
        assert_eq!(RequestRecord::completed("GET", "/", 204, 1, 0).status_class(), 200);
        assert_eq!(RequestRecord::completed("GET", "/", 301, 1, 0).status_class(), 300);
        assert_eq!(RequestRecord::completed("GET", "/", 404, 1, 0).status_class(), 400);
        assert_eq!(RequestRecord::completed("GET", "/", 502, 1, 0).status_class(), 500);
        assert_eq!(RequestRecord::failed("GET", "/", 1, "refused").status_class(), 0);
    }

    #[test]
    fn test_is_success_boundaries() {
        assert!(RequestRecord::completed("GET", "/", 200, 1, 0).is_success());
        assert!(RequestRecord::completed("GET", "/", 299, 1, 0).is_success());
        assert!(!RequestRecord::completed("GET", "/", 300, 1, 0).is_success());
        assert!(!RequestRecord::completed("GET", "/", 199, 1, 0).is_success());
        assert!(!RequestRecord::failed("GET", "/", 1, "refused").is_success());
    }

    #[test]
    fn test_aggregate_stats_apply() {
        let mut stats = AggregateStats::default();

        stats.apply(&RequestRecord::completed("GET", "/a", 200, 50, 0));
        stats.apply(&RequestRecord::completed("GET", "/b", 500, 30, 0));

        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.successful_requests, 1);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.total_latency_ms, 80);
        assert!((stats.average_latency_ms - 40.0).abs() < f64::EPSILON);
        assert!((stats.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_stats_have_zero_average_and_rate() {
        let stats = AggregateStats::default();
        assert_eq!(stats.average_latency_ms, 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }
}
