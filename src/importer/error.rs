// ==========================================
// 汽修车间预约排产系统 - 导入层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入层错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("请求文件解析失败: {0}")]
    Csv(#[from] csv::Error),
}
