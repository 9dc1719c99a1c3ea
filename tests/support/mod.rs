//! 测试用的脚本化浏览器会话
//!
//! 按 URL 预先设定每个页面的行为（导航失败次数、是否崩溃、面板内容），
//! 不启动真实浏览器，也不真正等待。

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use registry_harvest::browser::{Session, SessionFactory};
use registry_harvest::error::SessionError;
use registry_harvest::infrastructure::Waiter;
use registry_harvest::Config;

pub const BASE_URL: &str = "https://bus.gov.ru";

/// 单个详情页的脚本
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    /// 标签出现前 `open_tab` 返回 `None` 的次数
    pub tab_delay: usize,
    /// 面板 HTML；`None` 表示标签始终不出现
    pub panel: Option<String>,
}

#[derive(Debug, Default)]
struct BrowserState {
    pages: HashMap<String, PageScript>,
    nav_failures: HashMap<String, usize>,
    crash_on: HashSet<String>,
    crash_on_tab: HashSet<String>,
    panic_on_tab: HashSet<String>,
    navigations: Vec<String>,
    created: usize,
    closed: usize,
}

/// 脚本化的“浏览器”，同时充当会话工厂
#[derive(Debug, Clone, Default)]
pub struct FakeBrowser {
    state: Arc<Mutex<BrowserState>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, script: PageScript) -> Self {
        self.state.lock().unwrap().pages.insert(url.to_string(), script);
        self
    }

    /// 前 `times` 次导航到 `url` 失败（非致命）
    pub fn failing_navigation(self, url: &str, times: usize) -> Self {
        self.state.lock().unwrap().nav_failures.insert(url.to_string(), times);
        self
    }

    /// 第一次导航到 `url` 时会话崩溃
    pub fn crash_on(self, url: &str) -> Self {
        self.state.lock().unwrap().crash_on.insert(url.to_string());
        self
    }

    /// 在 `url` 页面上第一次打开标签时会话崩溃
    pub fn crash_on_tab(self, url: &str) -> Self {
        self.state.lock().unwrap().crash_on_tab.insert(url.to_string());
        self
    }

    /// 在 `url` 页面上打开标签时 panic
    pub fn panic_on_tab(self, url: &str) -> Self {
        self.state.lock().unwrap().panic_on_tab.insert(url.to_string());
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().created
    }

    pub fn closed(&self) -> usize {
        self.state.lock().unwrap().closed
    }

    /// 直接得到一个会话（不经过工厂计数）
    pub fn session(&self) -> FakeSession {
        FakeSession {
            state: Arc::clone(&self.state),
            current: None,
            crashed: false,
        }
    }
}

#[async_trait]
impl SessionFactory for FakeBrowser {
    type Session = FakeSession;

    async fn create(&self) -> Result<FakeSession, SessionError> {
        self.state.lock().unwrap().created += 1;
        Ok(self.session())
    }
}

pub struct FakeSession {
    state: Arc<Mutex<BrowserState>>,
    current: Option<String>,
    crashed: bool,
}

impl FakeSession {
    fn ensure_alive(&self) -> Result<(), SessionError> {
        if self.crashed {
            return Err(SessionError::Crashed("窗口已关闭".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.ensure_alive()?;
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_string());

        if state.crash_on.remove(url) {
            self.crashed = true;
            return Err(SessionError::Crashed("窗口已关闭".to_string()));
        }

        if let Some(left) = state.nav_failures.get_mut(url) {
            if *left > 0 {
                *left -= 1;
                return Err(SessionError::Navigation {
                    url: url.to_string(),
                    message: "net::ERR_CONNECTION_RESET".to_string(),
                });
            }
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    async fn wait_for(&mut self, _selector: &str, _timeout: Duration) -> Result<bool, SessionError> {
        self.ensure_alive()?;
        Ok(self.current.is_some())
    }

    async fn open_tab(
        &mut self,
        _label: &str,
        _panel_wait: Duration,
    ) -> Result<Option<String>, SessionError> {
        self.ensure_alive()?;
        let Some(url) = self.current.clone() else {
            return Ok(None);
        };
        // 先释放锁再 panic，避免锁中毒影响之后的 close()
        let should_panic = self.state.lock().unwrap().panic_on_tab.contains(&url);
        if should_panic {
            panic!("脚本设定的 panic: {}", url);
        }
        let mut state = self.state.lock().unwrap();
        if state.crash_on_tab.remove(&url) {
            self.crashed = true;
            return Err(SessionError::Crashed("标签页已崩溃".to_string()));
        }
        let Some(script) = state.pages.get_mut(&url) else {
            return Ok(None);
        };
        if script.tab_delay > 0 {
            script.tab_delay -= 1;
            return Ok(None);
        }
        Ok(script.panel.clone())
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        self.ensure_alive()?;
        Ok("<html><body></body></html>".to_string())
    }

    async fn close(&mut self) {
        self.state.lock().unwrap().closed += 1;
    }
}

/// 只记录等待时长，不真正等待（克隆后共享同一份记录）
#[derive(Debug, Clone, Default)]
pub struct RecordingWaiter {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingWaiter {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }

    pub fn count(&self, duration: Duration) -> usize {
        self.waits().iter().filter(|d| **d == duration).count()
    }
}

#[async_trait]
impl Waiter for RecordingWaiter {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// 不写调试文件的默认配置
pub fn test_config() -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        page_dump_file: None,
        panel_dump_file: None,
        ..Config::default()
    }
}

/// 详情页完整地址
pub fn detail_url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

/// 只含识别号和负责人的面板
pub fn info_panel(inn: &str, director: &str) -> String {
    format!(
        r#"<div class="mat-tab-body-wrapper"><app-other-information-tab>
             <div><div>ИНН {inn}</div><div>КПП 231001001</div></div>
             <div class="row"><div>Директор</div><div>{director}</div></div>
           </app-other-information-tab></div>"#
    )
}

/// 写入输入名单
pub fn write_register(path: &Path, entries: &[serde_json::Value]) {
    std::fs::write(path, serde_json::to_string_pretty(entries).unwrap()).unwrap();
}

pub fn read_results(path: &Path) -> Vec<serde_json::Value> {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}
