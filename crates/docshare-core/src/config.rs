//! 应用配置和持久化
//!
//! 提供服务地址、租户、默认类别等设置的存储和读取。
//! 认证令牌不落盘，保存在系统钥匙串（见 `credentials` 模块）。

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// 认证方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[default]
    Basic,
    Bearer,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// DMS 服务基础地址
    pub base_url: String,
    /// 租户名称
    pub tenant_name: String,
    /// 默认上传类别编号
    pub category_no: i32,
    /// 默认上传类别名称（仅用于显示）
    pub category_name: String,
    /// 认证方式
    pub auth_type: AuthType,
    /// 多文件打包时的默认归档名
    pub default_archive: String,
    /// 是否已完成初始配置
    pub is_set_up: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            tenant_name: String::new(),
            category_no: 0,
            category_name: String::new(),
            auth_type: AuthType::default(),
            default_archive: "Archive".to_string(),
            is_set_up: false,
        }
    }
}

impl AppSettings {
    /// 获取配置文件路径
    fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docshare");
        config_dir.join("settings.toml")
    }

    /// 加载设置（如果文件不存在则使用默认值）
    pub fn load() -> Self {
        let path = Self::config_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(settings) => {
                        debug!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        log::warn!("Failed to parse settings: {}, using defaults", e);
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read settings file: {}, using defaults", e);
                }
            }
        }
        Self::default()
    }

    /// 保存设置
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        debug!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_toml_roundtrip() {
        let settings = AppSettings {
            base_url: "https://dms.example.com".to_string(),
            tenant_name: "acme".to_string(),
            category_no: 42,
            category_name: "Invoices".to_string(),
            auth_type: AuthType::Bearer,
            default_archive: "Bundle".to_string(),
            is_set_up: true,
        };

        let content = toml::to_string_pretty(&settings).unwrap();
        let parsed: AppSettings = toml::from_str(&content).unwrap();

        assert_eq!(parsed.base_url, settings.base_url);
        assert_eq!(parsed.category_no, 42);
        assert_eq!(parsed.auth_type, AuthType::Bearer);
        assert!(parsed.is_set_up);
    }

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_archive, "Archive");
        assert_eq!(settings.auth_type, AuthType::Basic);
        assert!(!settings.is_set_up);
    }
}
