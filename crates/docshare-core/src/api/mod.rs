//! DMS REST API 模块
//!
//! 包含:
//! - 认证 HTTP 客户端（状态码到错误的映射、整体超时）
//! - 文档创建（带进度上报的请求体流）
//! - 分享链接的创建 / 查询 / 吊销
//! - 类别树获取

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError};
pub use types::{
    CreateDocumentResponse, IndexField, SharedLinkEntry, SharedLinkInfo, SharedLinkResponse,
};
