// ==========================================
// 汽修车间预约排产系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 调用方按类别模式匹配, 而不是捕获异常
// ==========================================

use crate::repository::error::StoreError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum ScheduleError {
    // ===== 引用查找失败: 单个请求失败, 不产生任何日历变更 =====
    #[error("查无记录: {entity} ({key})")]
    LookupFailure { entity: &'static str, key: String },

    // ===== 重复实体: 落库前即被拒绝 =====
    #[error("重复记录: {message}")]
    DuplicateEntity { message: String },

    // ===== 配置错误: 排产无法进行, 对会话致命 =====
    #[error("配置错误: {message}")]
    ConfigurationFailure { message: String },

    // ===== 持久层错误: 原样向上传递 =====
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScheduleError {
    /// 构造查找失败错误
    pub fn lookup(entity: &'static str, key: impl Into<String>) -> Self {
        ScheduleError::LookupFailure {
            entity,
            key: key.into(),
        }
    }
}

/// Result 类型别名
pub type ScheduleResult<T> = Result<T, ScheduleError>;
