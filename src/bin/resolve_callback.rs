//! 回调解析调试工具
//!
//! 按配置构建存储，对给定的回调URL运行一次会话解析并打印结果

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use whispr_session::auth::{AuthOutcome, CallbackResolver, Role, ScheduledRedirect};
use whispr_session::storage::UnifiedStorageManager;
use whispr_session::{Result, config, logging};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(about = "解析一次OAuth回调并打印结果")]
struct Args {
    /// 完整的回调URL（含查询参数或片段）
    url: String,

    /// 请求的角色：organizer 或 attendee
    #[arg(long, value_parser = parse_role)]
    role: Role,

    /// 预先保存一个登录前深链接
    #[arg(long)]
    saved_redirect: Option<String>,

    /// 日志级别
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_role(value: &str) -> std::result::Result<Role, String> {
    Role::parse(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    logging::init_logging(args.log_level.as_ref());

    let app_config = config::load_config()?;
    let storage = Arc::new(UnifiedStorageManager::new(&app_config.storage)?);
    let resolver = CallbackResolver::new(Arc::clone(&storage));

    if let Some(saved) = &args.saved_redirect {
        println!("保存登录前深链接: {saved}");
        resolver.redirects().save_intent(saved).await?;
    }

    let outcome = resolver.resolve_url(&args.url, args.role).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let AuthOutcome::Failure { message, login_url } = &outcome {
        let delay = Duration::from_secs(app_config.auth.failure_redirect_delay_secs);
        println!("认证失败: {message}");
        println!("{}秒后跳转回登录页...", delay.as_secs());

        let scheduled = ScheduledRedirect::schedule(login_url.clone(), delay, |target| {
            println!("跳转到: {target}");
        });
        tokio::time::sleep(delay + Duration::from_millis(100)).await;
        drop(scheduled);
    }

    Ok(())
}
