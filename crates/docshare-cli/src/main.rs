//! Docshare CLI
//!
//! 命令行客户端：把本地文件打包上传到 DMS 并生成分享链接

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use docshare_core::config::{AppSettings, AuthType};
use docshare_core::credentials;
use docshare_core::{
    ApiClient, ShareError, ShareEvent, ShareOptions, SimpleShareCallback, flatten_categories,
    share,
};

#[derive(Parser)]
#[command(name = "docshare", version, about = "DMS 文件上传分享工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 打包并分享文件
    Share {
        /// 要分享的文件路径
        files: Vec<PathBuf>,
        /// 链接密码
        #[arg(short, long)]
        password: Option<String>,
        /// 过期天数 (0 = 永不过期)
        #[arg(long, default_value = "0")]
        expire_days: i64,
        /// 显式过期时间 (ISO 8601，优先于 --expire-days)
        #[arg(long)]
        expire_at: Option<String>,
        /// 目标类别编号 (默认使用配置中的类别)
        #[arg(short, long)]
        category: Option<i32>,
    },
    /// 列出可用的上传类别
    Categories,
    /// 测试连接和凭据
    Test,
    /// 保存认证凭据到系统钥匙串
    Login {
        /// 用户名 (Basic 认证)
        #[arg(short, long)]
        username: Option<String>,
        /// 密码 (Basic 认证)
        #[arg(short, long)]
        password: Option<String>,
        /// 令牌 (Bearer 认证)
        #[arg(short, long)]
        token: Option<String>,
    },
    /// 删除已保存的认证凭据
    Logout,
    /// 列出我创建的分享链接
    Links,
    /// 吊销分享链接
    Revoke {
        /// 链接 ID
        link_id: String,
    },
    /// 查看或修改配置
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// 显示当前配置
    Show,
    /// 修改配置项
    Set {
        /// DMS 服务基础地址
        #[arg(long)]
        base_url: Option<String>,
        /// 租户名称
        #[arg(long)]
        tenant: Option<String>,
        /// 默认上传类别编号
        #[arg(long)]
        category: Option<i32>,
        /// 多文件打包时的默认归档名
        #[arg(long)]
        archive_name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 桥接 log crate（docshare-core 使用）到 tracing
    let _ = tracing_log::LogTracer::init();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,docshare_core=debug")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Share {
            files,
            password,
            expire_days,
            expire_at,
            category,
        } => run_share(files, password, expire_days, expire_at, category).await,
        Commands::Categories => run_categories().await,
        Commands::Test => run_test().await,
        Commands::Login {
            username,
            password,
            token,
        } => run_login(username, password, token),
        Commands::Logout => {
            credentials::delete_token()?;
            println!("✅ 已删除凭据");
            Ok(())
        }
        Commands::Links => run_links().await,
        Commands::Revoke { link_id } => {
            let client = build_client()?;
            client.revoke_shared_link(&link_id).await?;
            println!("✅ 已吊销链接 {}", link_id);
            Ok(())
        }
        Commands::Config { command } => run_config(command),
    }
}

/// 从配置和钥匙串构建 API 客户端
fn build_client() -> Result<ApiClient> {
    let settings = AppSettings::load();
    if settings.base_url.is_empty() {
        bail!("未配置服务地址，请先运行: docshare config set --base-url <URL>");
    }

    let token = credentials::retrieve_token()?
        .context("未找到认证凭据，请先运行: docshare login")?;

    Ok(ApiClient::new(
        &settings.base_url,
        &settings.tenant_name,
        &token,
    )?)
}

async fn run_share(
    files: Vec<PathBuf>,
    password: Option<String>,
    expire_days: i64,
    expire_at: Option<String>,
    category: Option<i32>,
) -> Result<()> {
    let settings = AppSettings::load();
    let client = build_client()?;

    let category_no = category.unwrap_or(settings.category_no);
    if category_no == 0 {
        bail!("未指定上传类别，使用 --category 或先配置默认类别");
    }

    println!("📤 分享 {} 个文件", files.len());

    let options = ShareOptions {
        paths: files,
        category_no,
        password,
        expiry_days: if expire_at.is_some() { -1 } else { expire_days },
        custom_expiry: expire_at,
        default_label: settings.default_archive,
    };

    // Ctrl-C 取消上传
    let cancel = CancellationToken::new();
    let ctrl_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_token.cancel();
        }
    });

    let (callback, mut events) = SimpleShareCallback::new();
    let task = tokio::spawn(async move {
        share(&client, options, cancel, Arc::new(callback)).await
    });

    while let Some(event) = events.recv().await {
        match event {
            ShareEvent::Status(status) => println!("▶ {}", status),
            ShareEvent::Progress { sent, total, percent } => {
                print!("\r   上传进度: {}% ({}/{} 字节)", percent, sent, total);
                let _ = std::io::stdout().flush();
            }
            ShareEvent::Complete(result) => {
                println!();
                println!("✅ 分享链接: {}", result.link_url);
                println!("   文档编号: {}", result.doc_no);
                if let Some(expires_at) = result.expires_at {
                    println!("   过期时间: {}", expires_at);
                }
            }
            ShareEvent::Error(error) => {
                println!();
                eprintln!("❌ {}", error);
            }
        }
    }

    match task.await? {
        Ok(_) => Ok(()),
        Err(ShareError::Cancelled) => {
            println!("⏹️  上传已取消");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_categories() -> Result<()> {
    let client = build_client()?;
    let tree = client.get_categories_tree().await?;
    let categories = flatten_categories(&tree, "");

    if categories.is_empty() {
        println!("   未找到类别");
    } else {
        for category in &categories {
            println!("   [{}] {}", category.item_no, category.path);
        }
    }
    Ok(())
}

async fn run_test() -> Result<()> {
    let client = build_client()?;
    client.test_connection().await?;
    println!("✅ 连接正常");
    Ok(())
}

fn run_login(
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
) -> Result<()> {
    let mut settings = AppSettings::load();

    let auth_token = match (username, password, token) {
        (_, _, Some(token)) => {
            settings.auth_type = AuthType::Bearer;
            credentials::bearer_auth_token(&token)
        }
        (Some(username), Some(password), None) => {
            settings.auth_type = AuthType::Basic;
            credentials::basic_auth_token(&username, &password)
        }
        _ => bail!("请提供 --token 或 --username 与 --password"),
    };

    credentials::store_token(&auth_token)?;
    settings.save()?;
    println!("✅ 凭据已保存到系统钥匙串");
    Ok(())
}

async fn run_links() -> Result<()> {
    let client = build_client()?;
    let entries = client.get_shared_links_shared_by_me().await?;

    if entries.is_empty() {
        println!("   没有分享链接");
        return Ok(());
    }

    for entry in &entries {
        let link = &entry.shared_link;
        println!("🔗 {} ({})", entry.document_title, entry.category_name);
        println!("   ID: {}", link.link_id);
        println!("   URL: {}", link.link_url);
        if !link.expires_at.is_empty() {
            println!("   过期: {}", link.expires_at);
        }
        if link.is_password_protected {
            println!("   🔒 密码保护");
        }
    }
    Ok(())
}

fn run_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let settings = AppSettings::load();
            println!("服务地址: {}", settings.base_url);
            println!("租户: {}", settings.tenant_name);
            println!(
                "默认类别: [{}] {}",
                settings.category_no, settings.category_name
            );
            println!("默认归档名: {}", settings.default_archive);
        }
        ConfigCommands::Set {
            base_url,
            tenant,
            category,
            archive_name,
        } => {
            let mut settings = AppSettings::load();
            if let Some(base_url) = base_url {
                settings.base_url = base_url;
            }
            if let Some(tenant) = tenant {
                settings.tenant_name = tenant;
            }
            if let Some(category) = category {
                settings.category_no = category;
            }
            if let Some(archive_name) = archive_name {
                settings.default_archive = archive_name;
            }
            settings.is_set_up = !settings.base_url.is_empty();
            settings.save()?;
            println!("✅ 配置已保存");
        }
    }
    Ok(())
}
