//! 分享工作流
//!
//! 高层 API 封装完整的分享流程:
//! 1. 校验输入文件
//! 2. 打包 ZIP 归档并解析上传文件名
//! 3. 上传为新文档（带进度和取消支持）
//! 4. 计算过期时间
//! 5. 创建公开分享链接
//!
//! 每个阶段快速失败并中止后续流程，不做重试。链接创建失败时
//! 已上传的文档不会回滚，调用方可通过 [`ShareError::Link`] 携带的
//! 文档编号自行清理。

use log::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::archive::{ArchiveError, build_archive, upload_file_name};
use crate::progress::ProgressObserver;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// 分享流程错误
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("invalid input {path:?}: {reason}")]
    Validation { path: PathBuf, reason: String },

    #[error("failed to build archive: {0}")]
    Archive(#[from] ArchiveError),

    #[error("upload failed: {0}")]
    Api(ApiError),

    #[error("upload cancelled")]
    Cancelled,

    /// 链接创建失败。文档 `doc_no` 已经上传成功，成为无链接的孤儿文档
    #[error("failed to create shared link for document {doc_no}: {source}")]
    Link {
        doc_no: i64,
        #[source]
        source: ApiError,
    },
}

impl From<ApiError> for ShareError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Cancelled => ShareError::Cancelled,
            other => ShareError::Api(other),
        }
    }
}

/// 分享选项
#[derive(Debug, Clone, Default)]
pub struct ShareOptions {
    /// 要分享的本地文件（绝对路径）
    pub paths: Vec<PathBuf>,
    /// 目标类别编号
    pub category_no: i32,
    /// 链接密码（可选，服务端应用）
    pub password: Option<String>,
    /// 过期天数: >0 = 从现在起 N 天，0 = 永不过期，-1 = 使用 `custom_expiry`
    pub expiry_days: i64,
    /// 显式过期时间戳 (ISO 8601)，仅在 `expiry_days == -1` 时生效
    pub custom_expiry: Option<String>,
    /// 多文件打包时的默认归档名
    pub default_label: String,
}

/// 分享结果
#[derive(Debug, Clone)]
pub struct ShareResult {
    pub link_url: String,
    pub doc_no: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

/// 分享进度回调
pub trait ShareCallback: Send + Sync {
    /// 阶段状态更新
    fn on_status(&self, status: &str);
    /// 上传进度更新
    fn on_progress(&self, sent: u64, total: u64, percent: u8);
    /// 分享完成
    fn on_complete(&self, result: &ShareResult);
    /// 分享失败（取消不经过此回调）
    fn on_error(&self, error: &str);
}

/// 把分享回调转接为上传进度观察者
struct ProgressForwarder<C>(Arc<C>);

impl<C: ShareCallback + 'static> ProgressObserver for ProgressForwarder<C> {
    fn on_progress(&self, sent: u64, total: u64, percent: u8) {
        self.0.on_progress(sent, total, percent);
    }
}

/// 校验输入文件集
///
/// 所有路径必须存在、可访问且不是目录。遇到第一个不合法的路径
/// 立即失败并在错误中指明该路径。
pub async fn validate_files(paths: &[PathBuf]) -> Result<(), ShareError> {
    if paths.is_empty() {
        return Err(ShareError::Validation {
            path: PathBuf::new(),
            reason: "no files selected".to_string(),
        });
    }

    for path in paths {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ShareError::Validation {
                    path: path.clone(),
                    reason: "file does not exist".to_string(),
                });
            }
            Err(e) => {
                return Err(ShareError::Validation {
                    path: path.clone(),
                    reason: format!("cannot access file: {}", e),
                });
            }
        };

        if metadata.is_dir() {
            return Err(ShareError::Validation {
                path: path.clone(),
                reason: "directories are not supported".to_string(),
            });
        }
    }

    Ok(())
}

/// 计算链接过期时间
///
/// - `expiry_days > 0`: 从现在起 N 天
/// - `expiry_days == -1` 且给出时间戳: 使用该时间戳；解析失败静默视为永不过期
/// - 其他情况: 永不过期
pub fn compute_expiry(expiry_days: i64, custom_expiry: Option<&str>) -> Option<DateTime<Utc>> {
    if expiry_days > 0 {
        return Some(Utc::now() + Duration::days(expiry_days));
    }

    if expiry_days == -1
        && let Some(stamp) = custom_expiry
    {
        return match DateTime::parse_from_rfc3339(stamp) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                // 过期时间解析失败不中止分享
                warn!("Failed to parse custom expiry {:?}: {}", stamp, e);
                None
            }
        };
    }

    None
}

/// 执行完整的分享流程
///
/// `cancel` 由调用方持有，每次调用应传入独立的 token；取消只影响
/// 持有该 token 的这一次上传。取消发生在上传窗口之外时是空操作。
pub async fn share<C>(
    client: &ApiClient,
    options: ShareOptions,
    cancel: CancellationToken,
    callback: Arc<C>,
) -> Result<ShareResult, ShareError>
where
    C: ShareCallback + 'static,
{
    let result = run_pipeline(client, &options, &cancel, &callback).await;

    match &result {
        Ok(r) => callback.on_complete(r),
        // 取消是正常的终止路径，不作为错误上报
        Err(ShareError::Cancelled) => callback.on_status("已取消"),
        Err(e) => callback.on_error(&e.to_string()),
    }

    result
}

async fn run_pipeline<C>(
    client: &ApiClient,
    options: &ShareOptions,
    cancel: &CancellationToken,
    callback: &Arc<C>,
) -> Result<ShareResult, ShareError>
where
    C: ShareCallback + 'static,
{
    callback.on_status("校验文件...");
    validate_files(&options.paths).await?;

    callback.on_status("打包归档...");
    let archive = build_archive(&options.paths).await?;
    let file_name = upload_file_name(&options.paths, &options.default_label);

    info!(
        "Uploading {} ({} bytes) to category {}",
        file_name,
        archive.len(),
        options.category_no
    );

    callback.on_status("上传中...");
    let observer: Arc<dyn ProgressObserver> = Arc::new(ProgressForwarder(callback.clone()));
    let document = client
        .create_document(
            options.category_no,
            &file_name,
            &archive,
            Vec::new(),
            cancel,
            observer,
        )
        .await?;

    let expires_at = compute_expiry(options.expiry_days, options.custom_expiry.as_deref());

    callback.on_status("创建分享链接...");
    let link = client
        .create_shared_link(
            document.doc_no,
            options.password.as_deref(),
            expires_at,
            &file_name,
        )
        .await
        .map_err(|e| ShareError::Link {
            doc_no: document.doc_no,
            source: e,
        })?;

    Ok(ShareResult {
        link_url: link.url,
        doc_no: document.doc_no,
        expires_at,
    })
}

/// 基于 mpsc 通道的分享回调实现
pub struct SimpleShareCallback {
    tx: mpsc::Sender<ShareEvent>,
}

#[derive(Debug, Clone)]
pub enum ShareEvent {
    Status(String),
    Progress { sent: u64, total: u64, percent: u8 },
    Complete(ShareResult),
    Error(String),
}

impl SimpleShareCallback {
    pub fn new() -> (Self, mpsc::Receiver<ShareEvent>) {
        let (tx, rx) = mpsc::channel(128);
        (Self { tx }, rx)
    }
}

impl ShareCallback for SimpleShareCallback {
    fn on_status(&self, status: &str) {
        let _ = self.tx.try_send(ShareEvent::Status(status.to_string()));
    }

    fn on_progress(&self, sent: u64, total: u64, percent: u8) {
        let _ = self.tx.try_send(ShareEvent::Progress {
            sent,
            total,
            percent,
        });
    }

    fn on_complete(&self, result: &ShareResult) {
        let _ = self.tx.try_send(ShareEvent::Complete(result.clone()));
    }

    fn on_error(&self, error: &str) {
        let _ = self.tx.try_send(ShareEvent::Error(error.to_string()));
    }
}
