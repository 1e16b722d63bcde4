//! 受监控的 HTTP 客户端
//!
//! 为每次请求计时，并把结果归一化为请求记录喂入统计聚合器。

use reqwest::Method;
use std::sync::Arc;
use std::time::Instant;

use crate::client::http::{ClientError, HttpClient, HttpResponse, HttpTransport};
use crate::config::ClientConfig;
use crate::telemetry::{RequestRecord, StatsAggregator};

/// 受监控的 HTTP 客户端
///
/// 包装任意 [`HttpTransport`]，请求完成（无论成败）后向共享的
/// [`StatsAggregator`] 写入一条 [`RequestRecord`]：
/// - 收到响应 → 原样记录状态码与响应体大小
/// - 未收到响应（超时、连接失败）→ 哨兵状态码 0 加错误信息
///
/// 聚合器对传输实现保持无感知，只见归一化后的记录。
pub struct MonitoredClient<T = HttpClient> {
    transport: T,
    stats: Arc<StatsAggregator>,
}

impl MonitoredClient<HttpClient> {
    /// 按客户端配置创建，并绑定共享聚合器
    pub fn new(config: &ClientConfig, stats: Arc<StatsAggregator>) -> Result<Self, ClientError> {
        Ok(Self {
            transport: HttpClient::new(config)?,
            stats,
        })
    }
}

impl<T: HttpTransport> MonitoredClient<T> {
    /// 使用指定传输创建（测试中可注入脚本化传输）
    pub fn with_transport(transport: T, stats: Arc<StatsAggregator>) -> Self {
        Self { transport, stats }
    }

    /// 绑定的聚合器
    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    /// 执行请求并记录结果
    ///
    /// 返回值与底层传输一致；记录动作本身不产生错误。
    pub async fn monitored_request(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, ClientError> {
        let method_name = method.to_string();
        let started = Instant::now();

        let result = self.transport.execute(method, url, body).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => {
                self.stats.record(RequestRecord::completed(
                    &method_name,
                    url,
                    response.status_code,
                    latency_ms,
                    response.bytes,
                ));
            }
            Err(error) => match error.status_code() {
                // 收到状态码的错误按实际状态记录，错误文本不进记录
                Some(status) => {
                    self.stats.record(RequestRecord::completed(
                        &method_name,
                        url,
                        status,
                        latency_ms,
                        0,
                    ));
                }
                None => {
                    self.stats.record(RequestRecord::failed(
                        &method_name,
                        url,
                        latency_ms,
                        error.to_string(),
                    ));
                }
            },
        }

        result
    }

    /// 受监控的 GET 请求
    pub async fn get(&self, url: &str) -> Result<HttpResponse, ClientError> {
        self.monitored_request(Method::GET, url, None).await
    }

    /// 受监控的 POST 请求
    pub async fn post(
        &self,
        url: &str,
        data: serde_json::Value,
    ) -> Result<HttpResponse, ClientError> {
        self.monitored_request(Method::POST, url, Some(data)).await
    }

    /// 受监控的 PUT 请求
    pub async fn put(
        &self,
        url: &str,
        data: serde_json::Value,
    ) -> Result<HttpResponse, ClientError> {
        self.monitored_request(Method::PUT, url, Some(data)).await
    }

    /// 受监控的 DELETE 请求
    pub async fn delete(&self, url: &str) -> Result<HttpResponse, ClientError> {
        self.monitored_request(Method::DELETE, url, None).await
    }
}
