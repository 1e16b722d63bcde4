//! HTTP 客户端
//!
//! 基于 reqwest 的薄封装：默认请求头、超时控制、按 Content-Type
//! 解析响应体，并把传输层错误归一化为 [`ClientError`]。

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;

pub use reqwest::Method;

/// 所有请求携带的基础请求头
static BASE_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("netpulse-client/", env!("CARGO_PKG_VERSION"))),
    );
    headers
});

/// 客户端错误类型
#[derive(Debug, Error)]
pub enum ClientError {
    /// 无效的请求 URL
    #[error("无效的请求 URL: {0}")]
    InvalidUrl(String),

    /// 客户端构建失败
    #[error("HTTP 客户端构建失败: {0}")]
    Build(String),

    /// 请求超时
    #[error("请求超时: {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// 网络错误（连接失败、DNS 解析失败等）
    #[error("网络错误: {0}")]
    Network(String),

    /// 收到非 2xx 状态码
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
}

impl ClientError {
    /// 关联的 HTTP 状态码（仅 `HttpStatus` 有值）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }
}

/// 响应体
///
/// JSON 响应按 Content-Type 自动解析，其余保留为文本。
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// 解析成功的 JSON
    Json(serde_json::Value),
    /// 纯文本
    Text(String),
    /// 空响应体
    Empty,
}

impl ResponseBody {
    /// 按 Content-Type 解析原始响应体
    pub(crate) fn parse(raw: &str, content_type: Option<&str>) -> Self {
        if raw.is_empty() {
            return ResponseBody::Empty;
        }

        let is_json = content_type
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        if is_json {
            // JSON 声明但内容不合法时退回文本，与响应照单全收的定位一致
            match serde_json::from_str(raw) {
                Ok(value) => ResponseBody::Json(value),
                Err(_) => ResponseBody::Text(raw.to_string()),
            }
        } else {
            ResponseBody::Text(raw.to_string())
        }
    }

    /// JSON 视图
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// 文本视图
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }
}

/// HTTP 响应
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// 状态码
    pub status_code: u16,
    /// 响应头（键为小写）
    pub headers: HashMap<String, String>,
    /// 解析后的响应体
    pub body: ResponseBody,
    /// 原始响应体字节数
    pub bytes: u64,
    /// 请求 URL
    pub url: String,
    /// 请求方法
    pub method: String,
}

impl HttpResponse {
    /// 状态码是否在 [200, 300) 区间
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// HTTP 传输接口
///
/// `execute` 对任何收到的状态码都返回 `Ok`——状态检查是上层语义，
/// 传输层只区分"收到响应"与"没收到响应"。
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 执行请求，收到任何状态码的响应都视为传输成功
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, ClientError>;
}

/// HTTP 客户端
///
/// 持有配置好的 reqwest 客户端；`get`/`post`/`put`/`delete`
/// 便捷方法在 `execute` 之上附加 2xx 状态检查。
pub struct HttpClient {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// 按配置创建客户端
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = BASE_HEADERS.clone();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::Build(format!("无效的请求头名 {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::Build(format!("无效的请求头值: {e}")))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            timeout_ms: config.timeout_ms,
        })
    }

    /// 使用默认配置创建客户端
    pub fn with_defaults() -> Result<Self, ClientError> {
        Self::new(&ClientConfig::default())
    }

    /// 校验并解析请求 URL，仅接受 http/https
    fn parse_url(url: &str) -> Result<Url, ClientError> {
        let parsed =
            Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(ClientError::InvalidUrl(format!(
                "{url}: 不支持的协议 {other}"
            ))),
        }
    }

    /// 把 reqwest 错误映射为客户端错误
    fn map_send_error(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            ClientError::Network(error.to_string())
        }
    }

    /// 带状态检查的请求：非 2xx 映射为 [`ClientError::HttpStatus`]
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, ClientError> {
        let response = self.execute(method, url, body).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ClientError::HttpStatus {
                status: response.status_code,
                message: response
                    .body
                    .as_text()
                    .map(str::to_string)
                    .or_else(|| response.body.as_json().map(|v| v.to_string()))
                    .unwrap_or_default(),
            })
        }
    }

    /// GET 请求
    pub async fn get(&self, url: &str) -> Result<HttpResponse, ClientError> {
        self.request(Method::GET, url, None).await
    }

    /// POST 请求
    pub async fn post(
        &self,
        url: &str,
        data: serde_json::Value,
    ) -> Result<HttpResponse, ClientError> {
        self.request(Method::POST, url, Some(data)).await
    }

    /// PUT 请求
    pub async fn put(
        &self,
        url: &str,
        data: serde_json::Value,
    ) -> Result<HttpResponse, ClientError> {
        self.request(Method::PUT, url, Some(data)).await
    }

    /// DELETE 请求
    pub async fn delete(&self, url: &str) -> Result<HttpResponse, ClientError> {
        self.request(Method::DELETE, url, None).await
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, ClientError> {
        let parsed = Self::parse_url(url)?;

        tracing::debug!("[CLIENT] {} {}", method, url);

        let mut request = self.client.request(method.clone(), parsed);
        if let Some(json) = body {
            request = request.json(&json);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status_code = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let content_type = headers.get(CONTENT_TYPE.as_str()).cloned();

        let raw = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("读取响应体失败: {e}")))?;

        Ok(HttpResponse {
            status_code,
            headers,
            bytes: raw.len() as u64,
            body: ResponseBody::parse(&raw, content_type.as_deref()),
            url: url.to_string(),
            method: method.to_string(),
        })
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_parse_url_accepts_http_and_https() {
        assert!(HttpClient::parse_url("http://127.0.0.1:3000/api/health").is_ok());
        assert!(HttpClient::parse_url("https://example.com/path?q=1").is_ok());
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(matches!(
            HttpClient::parse_url("ftp://example.com/file"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpClient::parse_url("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_response_body_parse_json() {
        let body = ResponseBody::parse(r#"{"status":"OK"}"#, Some("application/json"));
        assert_eq!(body.as_json().unwrap()["status"], "OK");
    }

    #[test]
    fn test_response_body_parse_invalid_json_falls_back_to_text() {
        let body = ResponseBody::parse("not-json", Some("application/json; charset=utf-8"));
        assert_eq!(body.as_text(), Some("not-json"));
    }

    #[test]
    fn test_response_body_parse_text_and_empty() {
        let body = ResponseBody::parse("hello", Some("text/plain"));
        assert_eq!(body.as_text(), Some("hello"));

        let body = ResponseBody::parse("", Some("application/json"));
        assert!(body.is_empty());
    }

    #[test]
    fn test_client_error_status_code() {
        let error = ClientError::HttpStatus {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(error.status_code(), Some(404));
        assert!(!error.is_timeout());

        let error = ClientError::Timeout { timeout_ms: 5000 };
        assert_eq!(error.status_code(), None);
        assert!(error.is_timeout());
    }

    #[test]
    fn test_client_creation_with_defaults() {
        let client = HttpClient::with_defaults();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_creation_rejects_invalid_header() {
        let config = ClientConfig {
            default_headers: vec![("无效头名".to_string(), "value".to_string())],
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpClient::new(&config),
            Err(ClientError::Build(_))
        ));
    }
}
