// ==========================================
// 汽修车间预约排产系统 - 配置层
// ==========================================
// 职责: 车间营业参数管理 (工作周/开门时刻/午休窗口)
// 存储: 内置默认值, 可被 config_kv 表覆写
// ==========================================

pub mod shop_config;

// 重导出核心配置
pub use shop_config::ShopConfig;
