use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use tracing::info;

use crate::config::Config;
use crate::models::StorageKeys;
use crate::orchestrator::RunStats;

/// 初始化日志文件（写入标题，覆盖上一次运行的内容）
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n机构信息抓取日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, keys: &StorageKeys) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 单线程顺序抓取模式");
    info!("🌐 站点: {}", config.base_url);
    info!("📥 输入名单: {}", keys.input.display());
    info!("📤 结果文件: {}", keys.output.display());
    info!("{}", "=".repeat(60));
}

/// 记录名单加载信息
///
/// # 参数
/// - `loaded`: 名单中的记录总数
/// - `pending`: 本次需要处理的数量
/// - `saved`: 结果文件中已有的数量
pub fn log_candidates_loaded(loaded: usize, pending: usize, saved: usize) {
    info!("✓ 名单共 {} 条，结果文件中已有 {} 条", loaded, saved);
    info!(
        "📋 去除无效、重复和已处理的 {} 条后，剩余 {} 条待处理\n",
        loaded - pending,
        pending
    );
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 本次运行统计
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(stats: &RunStats, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.recorded, stats.total);
    info!("⏭️ 跳过: {}", stats.skipped);
    info!("⚠️ 页面加载降级: {}", stats.degraded);
    info!("💥 浏览器崩溃: {}", stats.crashes);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
