//! DMS REST 客户端
//!
//! 所有请求带 `Authorization` 和 `TenantName` 头，JSON 收发。
//! 非 2xx 状态码按类别映射到 [`ApiError`]，调用方快速失败，不做重试。
//!
//! 文档创建请求通过 [`ProgressReader`] 把请求体包装成流，
//! 上传过程中按百分比上报进度，并在每个读取边界响应取消信号。

use log::{debug, info};

use crate::api::types::{
    CreateDocumentRequest, CreateDocumentResponse, CreateSharedLinkRequest, FILE_FORMAT_ORIGINAL,
    IndexField, PERMISSION_READ_ONLY, SHARE_TYPE_PUBLIC, SharedLinkEntry, SharedLinkResponse,
    StreamInfo,
};
use crate::progress::{ProgressObserver, ProgressReader};
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use serde::Deserialize;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

/// 服务端 REST 路径前缀
const API_PREFIX: &str = "theservice/v0001/restun";

/// 整体请求超时（大文件上传按分钟计）
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// API 错误
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication failed - please check your credentials")]
    AuthFailed,

    #[error("permission denied - you don't have rights to perform this action")]
    PermissionDenied,

    #[error("resource not found - the category or document may have been deleted")]
    NotFound,

    #[error("server error - please try again later or contact your administrator")]
    Server,

    #[error("API error (status {status}): {body}")]
    Unexpected { status: u16, body: String },

    #[error("upload cancelled")]
    Cancelled,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// 按状态码映射错误类别
    fn from_status(status: u16, body: &[u8]) -> Self {
        match status {
            401 => ApiError::AuthFailed,
            403 => ApiError::PermissionDenied,
            404 => ApiError::NotFound,
            500 | 502 | 503 => ApiError::Server,
            _ => ApiError::Unexpected {
                status,
                body: String::from_utf8_lossy(body).to_string(),
            },
        }
    }
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(rename = "TreeItems", default)]
    tree_items: Vec<crate::category::CategoryNode>,
}

#[derive(Deserialize)]
struct CreateDocumentWrapper {
    #[serde(rename = "CreateDocumentResult")]
    create_document_result: CreateDocumentResponse,
}

#[derive(Deserialize)]
struct SharedLinkWrapper {
    #[serde(rename = "SharedLink")]
    shared_link: SharedLinkResponse,
}

#[derive(Deserialize)]
struct SharedByMeResponse {
    #[serde(rename = "SharedLinkViewEntries", default)]
    entries: Vec<SharedLinkEntry>,
}

/// DMS API 客户端
pub struct ApiClient {
    base_url: String,
    tenant: String,
    auth_token: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, tenant: &str, auth_token: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant: tenant.to_string(),
            auth_token: auth_token.to_string(),
            http,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, endpoint)
    }

    /// 执行认证请求，返回响应体
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint_url(endpoint);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header("Authorization", &self.auth_token)
            .header("TenantName", &self.tenant)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &bytes));
        }

        Ok(bytes.to_vec())
    }

    /// 执行带进度上报的上传请求
    ///
    /// 请求体通过 [`ProgressReader`] 包装为流。发起前先检查取消信号，
    /// 已取消的操作不会发出网络请求。
    async fn request_with_progress(
        &self,
        endpoint: &str,
        body: Vec<u8>,
        cancel: &CancellationToken,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<Vec<u8>, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let url = self.endpoint_url(endpoint);
        let total = body.len() as u64;
        debug!("POST {} ({} bytes)", url, total);

        let reader = ProgressReader::new(Cursor::new(body), total, cancel.clone(), observer);
        let stream = ReaderStream::new(reader);

        let request = self
            .http
            .post(&url)
            .header("Authorization", &self.auth_token)
            .header("TenantName", &self.tenant)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            // 流式请求体需要显式声明长度
            .header(CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(stream));

        // 取消信号覆盖整个请求：请求体流完之后等待响应期间也能中止
        let response = tokio::select! {
            result = request.send() => result.map_err(|e| {
                if cancel.is_cancelled() {
                    ApiError::Cancelled
                } else {
                    ApiError::Request(e)
                }
            })?,
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
        };

        let status = response.status();
        let bytes = tokio::select! {
            result = response.bytes() => result?,
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
        };

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &bytes));
        }

        Ok(bytes.to_vec())
    }

    /// 测试连接（调用一个无副作用的系统接口）
    pub async fn test_connection(&self) -> Result<(), ApiError> {
        self.request(Method::GET, "help/operations/GetSystemCustomerId", None)
            .await?;
        Ok(())
    }

    /// 获取完整类别树
    pub async fn get_categories_tree(&self) -> Result<Vec<crate::category::CategoryNode>, ApiError> {
        let data = self
            .request(Method::POST, "GetCategoriesTree", Some(b"{}".to_vec()))
            .await?;

        let response: TreeResponse = serde_json::from_slice(&data)?;
        Ok(response.tree_items)
    }

    /// 创建文档（带上传进度）
    pub async fn create_document(
        &self,
        category_no: i32,
        file_name: &str,
        file_data: &[u8],
        index_data: Vec<IndexField>,
        cancel: &CancellationToken,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<CreateDocumentResponse, ApiError> {
        let request = CreateDocumentRequest {
            category_no,
            streams: vec![StreamInfo {
                file_name: file_name.to_string(),
                file_data_base64: base64::engine::general_purpose::STANDARD.encode(file_data),
            }],
            index_data,
        };

        let body = serde_json::to_vec(&request)?;
        let data = self
            .request_with_progress("CreateDocument", body, cancel, observer)
            .await?;

        let response = parse_create_document_response(&data)?;
        info!("Created document DocNo={}", response.doc_no);
        Ok(response)
    }

    /// 为文档创建公开只读分享链接
    pub async fn create_shared_link(
        &self,
        doc_no: i64,
        password: Option<&str>,
        expire: Option<DateTime<Utc>>,
        filename: &str,
    ) -> Result<SharedLinkResponse, ApiError> {
        let request = CreateSharedLinkRequest {
            doc_no,
            password: password.map(String::from),
            expire: expire.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            permission_type: PERMISSION_READ_ONLY,
            share_type: SHARE_TYPE_PUBLIC,
            file_format: FILE_FORMAT_ORIGINAL,
            filename: filename.to_string(),
        };

        let body = serde_json::to_vec(&request)?;
        let data = self
            .request(Method::POST, "CreateSharedLink", Some(body))
            .await?;

        let wrapper: SharedLinkWrapper = serde_json::from_slice(&data)?;
        info!("Created shared link LinkID={}", wrapper.shared_link.link_id);
        Ok(wrapper.shared_link)
    }

    /// 查询当前用户创建的分享链接
    pub async fn get_shared_links_shared_by_me(&self) -> Result<Vec<SharedLinkEntry>, ApiError> {
        let data = self
            .request(
                Method::POST,
                "GetSharedLinksSharedByMe",
                Some(br#"{"QueryId":0}"#.to_vec()),
            )
            .await?;

        let response: SharedByMeResponse = serde_json::from_slice(&data)?;
        Ok(response.entries)
    }

    /// 吊销分享链接
    pub async fn revoke_shared_link(&self, link_id: &str) -> Result<(), ApiError> {
        let body = serde_json::to_vec(&serde_json::json!({ "LinkId": link_id }))?;
        self.request(Method::POST, "RevokeSharedLink", Some(body))
            .await?;
        Ok(())
    }

    /// 删除文档
    pub async fn delete_document(&self, doc_no: i64) -> Result<(), ApiError> {
        let body = serde_json::to_vec(&serde_json::json!({ "DocNo": doc_no }))?;
        self.request(Method::POST, "DeleteDocument", Some(body))
            .await?;
        Ok(())
    }
}

/// 解析创建文档响应
///
/// 服务端有两种返回形式：字段在顶层，或包在 `CreateDocumentResult` 里。
fn parse_create_document_response(data: &[u8]) -> Result<CreateDocumentResponse, ApiError> {
    if let Ok(direct) = serde_json::from_slice::<CreateDocumentResponse>(data)
        && direct.doc_no > 0
    {
        return Ok(direct);
    }

    let wrapper: CreateDocumentWrapper = serde_json::from_slice(data)?;
    Ok(wrapper.create_document_result)
}
