//! netpulse 命令行入口
//!
//! 三种运行模式：
//! - `serve` — 启动演示 API 服务器
//! - `demo`  — 对服务器运行监控演示并打印报告
//! - `bench` — 运行并发请求基准

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use netpulse::config::AppConfig;
use netpulse::{demo, server};

fn print_usage() {
    eprintln!("用法: netpulse [serve|demo|bench] [base_url]");
    eprintln!("  serve         启动演示服务器（默认模式）");
    eprintln!("  demo [url]    运行监控演示，默认目标为本地服务器");
    eprintln!("  bench [url]   运行并发基准，默认目标为本地服务器");
    eprintln!("环境变量 NETPULSE_CONFIG 可指定 YAML 配置文件路径");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os("NETPULSE_CONFIG").map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("serve");
    let base_url = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| config.server.base_url());

    match mode {
        "serve" => server::serve(&config).await,
        "demo" => demo::run_demo(&config, &base_url).await,
        "bench" => demo::run_bench(&config, &base_url).await,
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }
}
