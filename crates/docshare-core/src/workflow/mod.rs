//! 工作流模块
//!
//! 提供高层 API 封装完整的分享流程

pub mod share;

pub use share::{
    ShareCallback, ShareError, ShareEvent, ShareOptions, ShareResult, SimpleShareCallback,
    compute_expiry, share, validate_files,
};
