// ==========================================
// 汽修车间预约排产系统 - 引擎层
// ==========================================
// 职责: 实现排产业务规则, 不拼 SQL
// 红线: Engine 不直接访问数据库 (落库经由仓储接口)
// ==========================================

pub mod clock;
pub mod error;
pub mod payroll;
pub mod quantizer;
pub mod scheduler;

// 重导出核心引擎
pub use clock::{next_monday_opening, ShopClock};
pub use error::{ScheduleError, ScheduleResult};
pub use payroll::{MechanicPaycheck, PayrollCalculator};
pub use quantizer::TimeQuantizer;
pub use scheduler::{RosterEntry, SchedulingEngine};
