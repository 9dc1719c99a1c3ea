use registry_harvest::browser::{Session, SessionFactory, TAB_LABEL_SELECTOR};
use registry_harvest::extract::parse_info;
use registry_harvest::services::INFO_TAB_LABEL;
use registry_harvest::{logger, ChromeSessionFactory, Config};
use std::time::Duration;

/// 需要可用的 Chrome 和网络，默认忽略：cargo test -- --ignored
/// 可通过 HARVEST_LIVE_DETAILS_URL 指定要打开的详情页
fn live_details_url(config: &Config) -> String {
    std::env::var("HARVEST_LIVE_DETAILS_URL")
        .unwrap_or_else(|_| format!("{}/agency/1", config.base_url.trim_end_matches('/')))
}

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_browser_session_lifecycle() {
    // 初始化日志
    logger::init(true, None);

    // 加载配置
    let config = Config::from_env().expect("加载配置失败");

    // 创建并关闭会话
    let factory = ChromeSessionFactory::from_config(&config);
    let mut session = factory.create().await.expect("创建浏览器会话失败");
    session
        .navigate(&config.base_url)
        .await
        .expect("打开站点首页失败");
    session.close().await;
}

#[tokio::test]
#[ignore]
async fn test_read_live_info_panel() {
    // 初始化日志
    logger::init(true, None);

    // 加载配置
    let config = Config::from_env().expect("加载配置失败");
    let url = live_details_url(&config);

    let factory = ChromeSessionFactory::from_config(&config);
    let mut session = factory.create().await.expect("创建浏览器会话失败");

    session.navigate(&url).await.expect("打开详情页失败");
    let ready = session
        .wait_for(TAB_LABEL_SELECTOR, config.tab_ready_timeout())
        .await
        .expect("等待标签栏失败");
    assert!(ready, "标签栏应在超时前出现");

    let fragment = session
        .open_tab(INFO_TAB_LABEL, Duration::from_secs(config.panel_wait_secs))
        .await
        .expect("打开信息标签失败")
        .expect("应能找到信息标签");
    session.close().await;

    let info = parse_info(&fragment).expect("面板应包含信息区块");
    assert!(info.inn.is_some(), "详情页应包含 ИНН");
}
