//! 桌面代理平台客户端核心实现

use std::sync::Arc;
use tokio::sync::RwLock;
use reqwest::{Client, Method};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::error::{BrokerError, Result};
use crate::api::{MachineApi, PoolApi};
use crate::models::ApiResponse;

/// 桌面代理平台客户端配置
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// 连接超时（秒）
    pub connect_timeout: u64,

    /// 请求超时（秒）
    pub request_timeout: u64,

    /// 是否验证 SSL 证书
    pub verify_ssl: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            request_timeout: 30,
            verify_ssl: true,
        }
    }
}

/// 桌面代理平台客户端
pub struct BrokerClient {
    /// API 基础 URL
    base_url: String,

    /// HTTP 客户端
    http_client: Client,

    /// 认证令牌
    access_token: Arc<RwLock<Option<String>>>,
}

impl BrokerClient {
    /// 创建新的桌面代理客户端
    pub fn new(base_url: &str, config: BrokerConfig) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| BrokerError::ConfigError(format!("无效的平台地址 {}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BrokerError::ConfigError(format!(
                "不支持的协议: {}",
                parsed.scheme()
            )));
        }

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| BrokerError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// 认证登录
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        info!("桌面代理登录: {}", username);

        let password_md5 = format!("{:x}", md5::compute(password.as_bytes()));

        let login_url = format!("{}/broker/v1/login", self.base_url);
        let login_data = serde_json::json!({
            "username": username,
            "password": password_md5,
            "client": ""
        });

        let response = self.http_client
            .post(&login_url)
            .json(&login_data)
            .send()
            .await
            .map_err(|e| BrokerError::HttpError(e.to_string()))?;

        let login_result: serde_json::Value = response.json().await
            .map_err(|e| BrokerError::ParseError(e.to_string()))?;

        if login_result["status"].as_i64().unwrap_or(-1) != 0 {
            let msg = login_result["msg"].as_str().unwrap_or("未知错误");
            return Err(BrokerError::AuthError(format!("桌面代理登录失败: {}", msg)));
        }

        let token = login_result["data"]["token"]
            .as_str()
            .ok_or_else(|| BrokerError::AuthError("未获取到 Token".to_string()))?
            .to_string();

        *self.access_token.write().await = Some(token);

        info!("桌面代理登录成功");
        Ok(())
    }

    /// 注销登出
    pub async fn logout(&mut self) -> Result<()> {
        info!("桌面代理登出");
        if self.access_token.read().await.is_some() {
            let _ = self.execute::<()>(Method::POST, "/broker/v1/logout", None).await;
        }
        *self.access_token.write().await = None;
        Ok(())
    }

    /// 会话存活检查
    pub async fn is_alive(&self) -> bool {
        match self.request::<(), serde_json::Value>(
            Method::GET,
            "/broker/v1/session",
            None,
        ).await {
            Ok(_) => true,
            Err(e) => {
                debug!("桌面代理会话探测失败: {}", e);
                false
            }
        }
    }

    /// 获取桌面池管理 API
    pub fn pool(&self) -> PoolApi<'_> {
        PoolApi::new(self)
    }

    /// 获取桌面管理 API
    pub fn machine(&self) -> MachineApi<'_> {
        MachineApi::new(self)
    }

    /// 发送 HTTP 请求并解包响应封装
    pub(crate) async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<T>,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        debug!("桌面代理 API 请求: {} {}", method, url);

        let token = self.access_token.read().await;
        let token_str = token.as_ref()
            .ok_or_else(|| BrokerError::AuthError("未认证，请先登录".to_string()))?;

        let mut request = self.http_client
            .request(method.clone(), &url)
            .header("Token", token_str)
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await
            .map_err(|e| BrokerError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "无法读取错误响应".to_string());
            warn!("API 请求失败: {} - {}", status, error_text);
            return Err(BrokerError::ApiError(status.as_u16(), error_text));
        }

        let envelope = response.json::<ApiResponse<R>>().await
            .map_err(|e| BrokerError::ParseError(e.to_string()))?;

        if envelope.status != 0 {
            let msg = envelope.msg.unwrap_or_else(|| "未知错误".to_string());
            return Err(BrokerError::OperationFailed(msg));
        }

        envelope.data
            .ok_or_else(|| BrokerError::ParseError("响应缺少 data 字段".to_string()))
    }

    /// 发送无返回数据的 HTTP 请求
    pub(crate) async fn execute<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<T>,
    ) -> Result<()> {
        match self.request::<T, serde_json::Value>(method, path, body).await {
            Ok(_) => Ok(()),
            Err(BrokerError::ParseError(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_client_creation() {
        let client = BrokerClient::new(
            "http://192.168.1.12:8443",
            BrokerConfig::default(),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_rejects_invalid_url() {
        let client = BrokerClient::new("192.168.1.12:8443", BrokerConfig::default());
        assert!(matches!(client, Err(BrokerError::ConfigError(_))));
    }
}
