//! Docshare Core Library
//!
//! 文档管理服务 (DMS) 上传分享客户端的核心实现库
//!
//! # 模块
//!
//! - **api**: DMS REST 客户端（文档创建、分享链接、类别树）
//! - **archive**: ZIP 打包和上传文件名解析
//! - **progress**: 带取消支持的上传进度流
//! - **category**: 类别树扁平化
//! - **workflow**: 高层分享流程编排
//! - **config**: 应用配置持久化
//! - **credentials**: 系统钥匙串凭据存储
//!
//! # 使用示例
//!
//! ## 分享文件
//!
//! ```ignore
//! use std::sync::Arc;
//! use docshare_core::{ApiClient, ShareOptions, SimpleShareCallback, share};
//! use tokio_util::sync::CancellationToken;
//!
//! // 1. 创建 API 客户端
//! let client = ApiClient::new("https://dms.example.com", "tenant", &auth_token)?;
//!
//! // 2. 配置分享选项
//! let options = ShareOptions {
//!     paths: vec!["report.docx".into()],
//!     category_no: 42,
//!     expiry_days: 7,
//!     ..Default::default()
//! };
//!
//! // 3. 执行分享（可通过 token 取消上传）
//! let token = CancellationToken::new();
//! let (callback, mut events) = SimpleShareCallback::new();
//! let result = share(&client, options, token, Arc::new(callback)).await?;
//! println!("{}", result.link_url);
//! ```

pub mod api;
pub mod archive;
pub mod category;
pub mod config;
pub mod credentials;
pub mod progress;
pub mod workflow;

// API re-exports
pub use api::{
    ApiClient, ApiError, CreateDocumentResponse, SharedLinkEntry, SharedLinkResponse,
};

// Archive re-exports
pub use archive::{ARCHIVE_EXTENSION, ArchiveError, build_archive, upload_file_name};

// Category re-exports
pub use category::{CategoryNode, FlatCategory, flatten_categories};

// Progress re-exports
pub use progress::{ChannelObserver, ProgressEvent, ProgressObserver, ProgressReader};

// Workflow re-exports
pub use workflow::{
    ShareCallback, ShareError, ShareEvent, ShareOptions, ShareResult, SimpleShareCallback, share,
};

// Config / credentials re-exports
pub use config::AppSettings;
pub use credentials::{basic_auth_token, bearer_auth_token};
