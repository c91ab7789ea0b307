// ==========================================
// 汽修车间预约排产系统 - 核心库
// ==========================================
// 排产规则: 先到先得; 预约必须当日完工; 多名技师同时可用时
//           低工位号优先
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与日历
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排产规则
pub mod engine;

// 导入层 - 请求文件
pub mod importer;

// 配置层 - 营业参数
pub mod config;

// 数据库基础设施 (连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// 表现层 - 报表
pub mod api;

// 应用层 - 会话装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{Appointment, Bay, Customer, Mechanic, MechanicCalendar, ServiceItem, ShopCatalog, Vehicle};

// 引擎
pub use engine::{
    MechanicPaycheck, PayrollCalculator, RosterEntry, ScheduleError, ScheduleResult, SchedulingEngine,
    ShopClock, TimeQuantizer,
};

// 配置
pub use config::ShopConfig;

// 表现层
pub use api::ScheduleReport;

// 应用层
pub use app::{get_default_db_path, ShopSession};

// 导入层
pub use importer::{ImportError, RequestFileParser, RequestOp};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "汽修车间预约排产系统";
