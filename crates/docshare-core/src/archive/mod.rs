//! 归档模块
//!
//! 包含:
//! - ZIP 归档构建（内存中，Deflate 压缩）
//! - 上传文件名解析

pub mod builder;
pub mod naming;

pub use builder::{ArchiveError, build_archive, is_archive};
pub use naming::upload_file_name;

/// 归档文件扩展名（不含点）
pub const ARCHIVE_EXTENSION: &str = "zip";
