//! 监控与统计模块
//!
//! 提供请求记录、会话统计聚合与报告渲染功能

mod observer;
mod report;
mod stats;
mod types;

pub use observer::{format_record_line, ConsoleObserver, RecordObserver, TracingObserver};
pub use report::{
    format_method_breakdown, format_slowest, format_status_breakdown, format_status_class,
    format_summary, render_report,
};
pub use stats::StatsAggregator;
pub use types::{AggregateStats, MethodStats, RequestRecord, SessionSummary};
