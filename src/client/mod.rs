//! HTTP 客户端模块
//!
//! 提供基础客户端与带统计记录的受监控客户端

mod http;
mod monitored;

pub use http::{ClientError, HttpClient, HttpResponse, HttpTransport, Method, ResponseBody};
pub use monitored::MonitoredClient;
