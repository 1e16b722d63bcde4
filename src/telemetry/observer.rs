//! 记录观察者
//!
//! 在每条记录被接受后触发的旁路副作用，与聚合逻辑解耦。

use crate::telemetry::types::RequestRecord;

/// 记录观察者
///
/// 由 [`StatsAggregator::add_observer`] 注册，在聚合器锁外被调用，
/// 实现方可以安全地回读聚合器状态。
///
/// [`StatsAggregator::add_observer`]: crate::telemetry::StatsAggregator::add_observer
pub trait RecordObserver: Send + Sync {
    /// 一条记录被接受后调用
    fn on_record(&self, record: &RequestRecord);
}

/// 格式化单条记录的控制台日志行
///
/// # 示例输出
/// - `[2026-08-06T10:00:00+00:00] ✅ GET /api/health - 200 (50ms)`
/// - `[2026-08-06T10:00:01+00:00] ❌ POST /api/echo - 0 (20ms) (连接被拒绝)`
pub fn format_record_line(record: &RequestRecord) -> String {
    let icon = if record.is_success() { "✅" } else { "❌" };
    let error_text = match &record.error {
        Some(error) => format!(" ({error})"),
        None => String::new(),
    };

    format!(
        "[{}] {} {} {} - {} ({}ms){}",
        record.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        icon,
        record.method,
        record.target,
        record.status_code,
        record.latency_ms,
        error_text
    )
}

/// 控制台观察者
///
/// 请求完成后立即把记录打印到标准输出，对应实时日志视图。
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl RecordObserver for ConsoleObserver {
    fn on_record(&self, record: &RequestRecord) {
        println!("{}", format_record_line(record));
    }
}

/// tracing 观察者
///
/// 以结构化字段记录请求结果，用于接入既有日志管道。
#[derive(Debug, Default)]
pub struct TracingObserver;

impl RecordObserver for TracingObserver {
    fn on_record(&self, record: &RequestRecord) {
        tracing::info!(
            "[TELEMETRY] method={} target={} status={} latency_ms={}",
            record.method,
            record.target,
            record.status_code,
            record.latency_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record_line_success() {
        let record = RequestRecord::completed("GET", "/api/health", 200, 50, 64);
        let line = format_record_line(&record);

        assert!(line.contains("✅"));
        assert!(line.contains("GET /api/health"));
        assert!(line.ends_with("- 200 (50ms)"));
    }

    #[test]
    fn test_format_record_line_failure_includes_error() {
        let record = RequestRecord::failed("POST", "http://127.0.0.1:9999/", 20, "连接被拒绝");
        let line = format_record_line(&record);

        assert!(line.contains("❌"));
        assert!(line.contains("- 0 (20ms)"));
        assert!(line.ends_with("(连接被拒绝)"));
    }

    #[test]
    fn test_format_record_line_http_error_has_no_error_suffix() {
        let record = RequestRecord::completed("GET", "/missing", 404, 5, 0);
        let line = format_record_line(&record);

        assert!(line.contains("❌"));
        assert!(line.ends_with("(5ms)"));
    }
}
