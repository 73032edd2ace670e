//! ZIP 归档构建
//!
//! 将一组本地文件打包为内存中的 ZIP 字节流，供上传使用。
//!
//! # 规则
//!
//! - 单个已是 `.zip` 的输入原样透传（逐字节，不重新压缩）
//! - 其他情况为每个文件创建一个条目，条目名只保留文件名（丢弃目录结构）
//! - 目录静默跳过
//! - 任何读取失败都会丢弃已构建的部分结果

use log::debug;

use crate::archive::ARCHIVE_EXTENSION;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// 归档构建错误
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("no files provided")]
    NoFiles,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// 判断路径扩展名是否为归档扩展名（大小写不敏感）
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(ARCHIVE_EXTENSION))
        .unwrap_or(false)
}

/// 构建上传用的 ZIP 归档
///
/// 返回完整的 ZIP 字节流。单个 `.zip` 输入直接返回原始字节。
pub async fn build_archive(paths: &[PathBuf]) -> Result<Vec<u8>, ArchiveError> {
    if paths.is_empty() {
        return Err(ArchiveError::NoFiles);
    }

    // 用户自备的归档不做二次打包
    if paths.len() == 1 && is_archive(&paths[0]) {
        debug!("Passing through existing archive: {:?}", paths[0]);
        return tokio::fs::read(&paths[0]).await.map_err(|e| ArchiveError::Io {
            path: paths[0].clone(),
            source: e,
        });
    }

    let mut buffer = Vec::new();

    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for path in paths {
            let metadata = tokio::fs::metadata(path).await.map_err(|e| ArchiveError::Io {
                path: path.clone(),
                source: e,
            })?;

            if metadata.is_dir() {
                debug!("Skipping directory: {:?}", path);
                continue;
            }

            // 条目名只保留文件名
            let entry_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            zip.start_file(entry_name.as_str(), options)?;

            let mut file = File::open(path).await.map_err(|e| ArchiveError::Io {
                path: path.clone(),
                source: e,
            })?;
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .await
                .map_err(|e| ArchiveError::Io {
                    path: path.clone(),
                    source: e,
                })?;

            zip.write_all(&contents).map_err(|e| ArchiveError::Io {
                path: path.clone(),
                source: e,
            })?;
        }

        zip.finish()?;
    }

    Ok(buffer)
}
