//! 计算平台客户端核心实现

use std::sync::Arc;
use tokio::sync::RwLock;
use reqwest::{Client, Method};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::error::{ComputeError, Result};
use crate::api::{InventoryApi, VmApi};
use crate::models::ApiResponse;

/// 计算平台客户端配置
#[derive(Debug, Clone)]
pub struct ComputeConfig {
    /// 连接超时（秒）
    pub connect_timeout: u64,

    /// 请求超时（秒）
    pub request_timeout: u64,

    /// 是否验证 SSL 证书
    pub verify_ssl: bool,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            request_timeout: 30,
            verify_ssl: true,
        }
    }
}

/// 计算平台客户端
pub struct ComputeClient {
    /// API 基础 URL
    base_url: String,

    /// HTTP 客户端
    http_client: Client,

    /// 认证令牌
    access_token: Arc<RwLock<Option<String>>>,
}

impl ComputeClient {
    /// 创建新的计算平台客户端
    pub fn new(base_url: &str, config: ComputeConfig) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| ComputeError::ConfigError(format!("无效的平台地址 {}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ComputeError::ConfigError(format!(
                "不支持的协议: {}",
                parsed.scheme()
            )));
        }

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| ComputeError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// 认证登录
    ///
    /// # Arguments
    /// * `username` - 用户名
    /// * `password` - 明文密码(将自动转换为MD5)
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        info!("计算平台登录: {}", username);

        let password_md5 = format!("{:x}", md5::compute(password.as_bytes()));

        let login_url = format!("{}/compute/v1/login", self.base_url);
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
            .map_err(|e| ComputeError::HttpError(e.to_string()))?;

        let login_result: serde_json::Value = response.json().await
            .map_err(|e| ComputeError::ParseError(e.to_string()))?;

        if login_result["status"].as_i64().unwrap_or(-1) != 0 {
            let msg = login_result["msg"].as_str().unwrap_or("未知错误");
            return Err(ComputeError::AuthError(format!("计算平台登录失败: {}", msg)));
        }

        let token = login_result["data"]["token"]
            .as_str()
            .ok_or_else(|| ComputeError::AuthError("未获取到 Token".to_string()))?
            .to_string();

        *self.access_token.write().await = Some(token);

        info!("计算平台登录成功");
        Ok(())
    }

    /// 注销登出
    pub async fn logout(&mut self) -> Result<()> {
        info!("计算平台登出");
        if self.access_token.read().await.is_some() {
            // 尽力通知服务端，本地令牌无条件清除
            let _ = self.request::<(), serde_json::Value>(
                Method::POST,
                "/compute/v1/logout",
                None,
            ).await;
        }
        *self.access_token.write().await = None;
        Ok(())
    }

    /// 会话存活检查
    ///
    /// 长时间等待后平台可能已回收会话，调用方应在每次阻塞等待
    /// 之后用本方法探测再继续。
    pub async fn is_alive(&self) -> bool {
        match self.request::<(), serde_json::Value>(
            Method::GET,
            "/compute/v1/session",
            None,
        ).await {
            Ok(_) => true,
            Err(e) => {
                debug!("计算平台会话探测失败: {}", e);
                false
            }
        }
    }

    /// 获取资源清单 API
    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi::new(self)
    }

    /// 获取虚拟机管理 API
    pub fn vm(&self) -> VmApi<'_> {
        VmApi::new(self)
    }

    /// 发送 HTTP 请求并解包响应封装
    pub(crate) async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<T>,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        debug!("计算平台 API 请求: {} {}", method, url);

        let token = self.access_token.read().await;
        let token_str = token.as_ref()
            .ok_or_else(|| ComputeError::AuthError("未认证，请先登录".to_string()))?;

        let mut request = self.http_client
            .request(method.clone(), &url)
            .header("Token", token_str)
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await
            .map_err(|e| ComputeError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "无法读取错误响应".to_string());
            warn!("API 请求失败: {} - {}", status, error_text);
            return Err(ComputeError::ApiError(status.as_u16(), error_text));
        }

        let envelope = response.json::<ApiResponse<R>>().await
            .map_err(|e| ComputeError::ParseError(e.to_string()))?;

        if envelope.status != 0 {
            let msg = envelope.msg.unwrap_or_else(|| "未知错误".to_string());
            return Err(ComputeError::OperationFailed(msg));
        }

        envelope.data
            .ok_or_else(|| ComputeError::ParseError("响应缺少 data 字段".to_string()))
    }

    /// 发送无返回数据的 HTTP 请求
    pub(crate) async fn execute<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<T>,
    ) -> Result<()> {
        // data 字段可能缺失，统一按 Value 容忍
        match self.request::<T, serde_json::Value>(method, path, body).await {
            Ok(_) => Ok(()),
            Err(ComputeError::ParseError(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// 获取基础 URL
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_client_creation() {
        let client = ComputeClient::new(
            "http://192.168.1.10:8088/",
            ComputeConfig::default(),
        );
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "http://192.168.1.10:8088");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let client = ComputeClient::new("ftp://192.168.1.10", ComputeConfig::default());
        assert!(matches!(client, Err(ComputeError::ConfigError(_))));
    }
}
