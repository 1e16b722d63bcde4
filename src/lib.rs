//! netpulse — HTTP 请求监控与统计实验
//!
//! 核心是一个以会话为单位的请求统计聚合器（[`telemetry`]），
//! 配套一个受监控的 HTTP 客户端（[`client`]）、一个演示 API
//! 服务器（[`server`]）以及驱动二者的演示脚本（[`demo`]）。

pub mod client;
pub mod config;
pub mod demo;
pub mod server;
pub mod telemetry;

pub use client::{ClientError, HttpClient, HttpResponse, MonitoredClient};
pub use config::AppConfig;
pub use telemetry::{
    AggregateStats, ConsoleObserver, RecordObserver, RequestRecord, SessionSummary,
    StatsAggregator,
};
