use anyhow::{Context, Result};
use registry_harvest::utils::logging::init_log_file;
use registry_harvest::{logger, Config, Harvester};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env().context("加载配置失败")?;

    // 初始化日志
    init_log_file(&config.output_log_file)?;
    logger::init(config.verbose_logging, Some(&config.output_log_file));

    // 初始化并运行
    let harvester = Harvester::initialize(config).await?;
    harvester.run().await?;

    Ok(())
}
