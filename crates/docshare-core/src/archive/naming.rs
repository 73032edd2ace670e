//! 上传文件名解析
//!
//! 根据输入文件集和配置的默认归档名确定上传时使用的文件名。
//! 结果总是以归档扩展名结尾，不接受用户自由输入。

use crate::archive::{ARCHIVE_EXTENSION, is_archive};
use chrono::Local;
use std::path::PathBuf;

/// 回退归档名（配置为空时使用）
const FALLBACK_LABEL: &str = "Archive";

/// 解析上传文件名
///
/// - 单个文件: 保留原文件名，扩展名替换为 `.zip`（已是 `.zip` 则原样保留）
/// - 多个文件: `<名称>-<yymmdd-hhmm>.zip`，同一分钟内的两次调用会得到相同结果
pub fn upload_file_name(paths: &[PathBuf], default_label: &str) -> String {
    if paths.len() == 1 {
        let path = &paths[0];
        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| FALLBACK_LABEL.to_string());

        if is_archive(path) {
            return base_name;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(base_name);
        return format!("{}.{}", stem, ARCHIVE_EXTENSION);
    }

    let label = if default_label.is_empty() {
        FALLBACK_LABEL
    } else {
        default_label
    };

    let timestamp = Local::now().format("%y%m%d-%H%M");
    format!("{}-{}.{}", label, timestamp, ARCHIVE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_single_file_replaces_extension() {
        assert_eq!(
            upload_file_name(&paths(&["/tmp/report.docx"]), "x"),
            "report.zip"
        );
    }

    #[test]
    fn test_single_file_without_extension() {
        assert_eq!(upload_file_name(&paths(&["/tmp/notes"]), "x"), "notes.zip");
    }

    #[test]
    fn test_single_zip_kept_unchanged() {
        assert_eq!(upload_file_name(&paths(&["/tmp/a.zip"]), "x"), "a.zip");
        assert_eq!(upload_file_name(&paths(&["/tmp/A.ZIP"]), "x"), "A.ZIP");
    }

    #[test]
    fn test_multiple_files_use_label_and_timestamp() {
        let name = upload_file_name(&paths(&["/tmp/a.txt", "/tmp/b.txt"]), "Bundle");
        assert!(name.starts_with("Bundle-"), "name: {}", name);
        assert!(name.ends_with(".zip"), "name: {}", name);

        // 时间戳格式: yymmdd-hhmm
        let stamp = &name["Bundle-".len()..name.len() - ".zip".len()];
        assert_eq!(stamp.len(), 11, "stamp: {}", stamp);
        for (i, c) in stamp.chars().enumerate() {
            if i == 6 {
                assert_eq!(c, '-', "stamp: {}", stamp);
            } else {
                assert!(c.is_ascii_digit(), "stamp: {}", stamp);
            }
        }
    }

    #[test]
    fn test_empty_label_falls_back() {
        let name = upload_file_name(&paths(&["/tmp/a.txt", "/tmp/b.txt"]), "");
        assert!(name.starts_with("Archive-"), "name: {}", name);
    }
}
