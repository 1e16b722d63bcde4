//! 监控报告渲染
//!
//! 把聚合器的查询结果格式化为人可读的文本报告。
//! 具体文案属于展示层，不构成聚合契约的一部分。

use crate::telemetry::stats::StatsAggregator;
use crate::telemetry::types::{AggregateStats, MethodStats, RequestRecord};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt::Write as _;

const LINE_WIDTH: usize = 80;

/// 百分比取整，分母为 0 时返回 0
fn percent(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u64
}

/// 格式化状态段标签
///
/// # 示例输出
/// - `2xx`、`4xx`
/// - `0 (连接失败)`
pub fn format_status_class(class: u16) -> String {
    if class == 0 {
        "0 (连接失败)".to_string()
    } else {
        format!("{}xx", class / 100)
    }
}

/// 格式化汇总区块
pub fn format_summary(stats: &AggregateStats, duration_ms: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📈 总请求数: {}", stats.total_requests);
    let _ = writeln!(
        out,
        "✅ 成功: {} ({}%)",
        stats.successful_requests,
        percent(stats.successful_requests, stats.total_requests)
    );
    let _ = writeln!(
        out,
        "❌ 失败: {} ({}%)",
        stats.failed_requests,
        percent(stats.failed_requests, stats.total_requests)
    );
    let _ = writeln!(out, "⏱️ 平均延迟: {}ms", stats.average_latency_ms.round() as u64);
    let _ = writeln!(out, "🏁 会话时长: {duration_ms}ms");
    out
}

/// 格式化按方法分组的区块
pub fn format_method_breakdown(buckets: &IndexMap<String, MethodStats>) -> String {
    let mut out = String::from("🔧 按 HTTP 方法:\n");
    for (method, bucket) in buckets {
        let _ = writeln!(
            out,
            "   {method}: {} 次请求, 平均 {}ms",
            bucket.count,
            bucket.average_latency_ms.round() as u64
        );
    }
    out
}

/// 格式化按状态段分组的区块
pub fn format_status_breakdown(buckets: &BTreeMap<u16, u64>) -> String {
    let mut out = String::from("📊 按状态码:\n");
    for (class, count) in buckets {
        let _ = writeln!(out, "   {}: {count} 次请求", format_status_class(*class));
    }
    out
}

/// 格式化最慢请求区块
pub fn format_slowest(records: &[RequestRecord]) -> String {
    let mut out = String::from("🐌 最慢请求:\n");
    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "   {}. {} {} - {}ms",
            index + 1,
            record.method,
            record.target,
            record.latency_ms
        );
    }
    out
}

/// 渲染完整监控报告
///
/// 汇总、方法分组、状态段分组与最慢 5 条请求。对固定会话内容
/// 输出是确定的。
pub fn render_report(aggregator: &StatsAggregator) -> String {
    let stats = aggregator.summarize();
    let separator = "=".repeat(LINE_WIDTH);

    let mut out = String::new();
    let _ = writeln!(out, "{separator}");
    let _ = writeln!(out, "📊 网络监控报告");
    let _ = writeln!(out, "{separator}");
    out.push_str(&format_summary(&stats, aggregator.session_duration_ms()));

    if stats.total_requests > 0 {
        out.push('\n');
        out.push_str(&format_method_breakdown(&aggregator.breakdown_by_method()));
        out.push('\n');
        out.push_str(&format_status_breakdown(&aggregator.breakdown_by_status_class()));
        out.push('\n');
        out.push_str(&format_slowest(&aggregator.slowest(5)));
    }

    let _ = writeln!(out, "{separator}");
    out
}
