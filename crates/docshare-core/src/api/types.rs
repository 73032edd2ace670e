//! DMS REST 接口的请求/响应类型
//!
//! 字段名与服务端 JSON 保持一致（PascalCase），通过 serde rename 映射。

use serde::{Deserialize, Serialize};

/// 分享链接权限: 只读
pub const PERMISSION_READ_ONLY: i32 = 1;
/// 分享范围: 公开
pub const SHARE_TYPE_PUBLIC: i32 = 2;
/// 下载格式: 原始文件
pub const FILE_FORMAT_ORIGINAL: i32 = 1;

/// 创建文档请求
#[derive(Debug, Serialize)]
pub struct CreateDocumentRequest {
    #[serde(rename = "CategoryNo")]
    pub category_no: i32,
    #[serde(rename = "Streams")]
    pub streams: Vec<StreamInfo>,
    #[serde(rename = "IndexData")]
    pub index_data: Vec<IndexField>,
}

/// 文件流（内容以 Base64 编码内嵌）
#[derive(Debug, Serialize)]
pub struct StreamInfo {
    #[serde(rename = "FileName")]
    pub file_name: String,
    #[serde(rename = "FileDataBase64JSON")]
    pub file_data_base64: String,
}

/// 索引字段
#[derive(Debug, Clone, Serialize)]
pub struct IndexField {
    #[serde(rename = "FieldNo")]
    pub field_no: i32,
    #[serde(rename = "FieldName", skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(rename = "Value")]
    pub value: String,
}

/// 创建文档响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDocumentResponse {
    #[serde(rename = "DocNo", default)]
    pub doc_no: i64,
    #[serde(rename = "VersionNo", default)]
    pub version_no: i32,
    #[serde(rename = "LastChangeTime", default)]
    pub last_change_time: String,
    #[serde(rename = "LastChangeTimeISO8601", default)]
    pub last_change_time_iso8601: String,
}

/// 创建分享链接请求
#[derive(Debug, Serialize)]
pub struct CreateSharedLinkRequest {
    #[serde(rename = "DocNo")]
    pub doc_no: i64,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// ISO 8601 时间戳，省略表示永不过期
    #[serde(rename = "Expire", skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
    #[serde(rename = "PermissionType")]
    pub permission_type: i32,
    #[serde(rename = "ShareType")]
    pub share_type: i32,
    #[serde(rename = "FileFormat")]
    pub file_format: i32,
    /// 建议的下载文件名
    #[serde(rename = "Filename")]
    pub filename: String,
}

/// 创建分享链接响应
#[derive(Debug, Clone, Deserialize)]
pub struct SharedLinkResponse {
    #[serde(rename = "LinkID", default)]
    pub link_id: String,
    #[serde(rename = "SharedLinkNo", default)]
    pub shared_link_no: i64,
    #[serde(rename = "LinkUrl", default)]
    pub url: String,
}

/// "我分享的链接" 列表项
#[derive(Debug, Clone, Deserialize)]
pub struct SharedLinkEntry {
    #[serde(rename = "CategoryName", default)]
    pub category_name: String,
    #[serde(rename = "DocumentTitle", default)]
    pub document_title: String,
    #[serde(rename = "SharedLink")]
    pub shared_link: SharedLinkInfo,
}

/// 分享链接详情
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedLinkInfo {
    #[serde(rename = "CreatedAt", default)]
    pub created_at: String,
    #[serde(rename = "DocNo", default)]
    pub doc_no: i64,
    #[serde(rename = "ExpiresAt", default)]
    pub expires_at: String,
    #[serde(rename = "Filename", default)]
    pub filename: String,
    #[serde(rename = "LinkId", default)]
    pub link_id: String,
    #[serde(rename = "LinkUrl", default)]
    pub link_url: String,
    #[serde(rename = "PermissionType", default)]
    pub permission_type: i32,
    #[serde(rename = "ShareType", default)]
    pub share_type: i32,
    #[serde(rename = "IsPasswordProtected", default)]
    pub is_password_protected: bool,
    #[serde(rename = "FileFormat", default)]
    pub file_format: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_document_request_wire_format() {
        let req = CreateDocumentRequest {
            category_no: 42,
            streams: vec![StreamInfo {
                file_name: "a.zip".to_string(),
                file_data_base64: "aGVsbG8=".to_string(),
            }],
            index_data: vec![],
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["CategoryNo"], 42);
        assert_eq!(json["Streams"][0]["FileName"], "a.zip");
        assert_eq!(json["Streams"][0]["FileDataBase64JSON"], "aGVsbG8=");
        assert_eq!(json["IndexData"], serde_json::json!([]));
    }

    #[test]
    fn test_shared_link_request_omits_optional_fields() {
        let req = CreateSharedLinkRequest {
            doc_no: 7,
            password: None,
            expire: None,
            permission_type: PERMISSION_READ_ONLY,
            share_type: SHARE_TYPE_PUBLIC,
            file_format: FILE_FORMAT_ORIGINAL,
            filename: "a.zip".to_string(),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("Password").is_none());
        assert!(json.get("Expire").is_none());
        assert_eq!(json["PermissionType"], 1);
        assert_eq!(json["ShareType"], 2);
        assert_eq!(json["FileFormat"], 1);
    }
}
