// ==========================================
// 汽修车间预约排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、只读目录、排班日历数据结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod appointment;
pub mod calendar;
pub mod catalog;

// 重导出核心类型
pub use appointment::Appointment;
pub use calendar::MechanicCalendar;
pub use catalog::{Bay, Customer, Mechanic, ServiceItem, ShopCatalog, Vehicle};
