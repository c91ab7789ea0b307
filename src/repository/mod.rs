// ==========================================
// 汽修车间预约排产系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含排产业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod appointment_repo;
pub mod customer_repo;
pub mod error;
pub mod shop_repo;

// 重导出核心仓储
pub use appointment_repo::AppointmentRepository;
pub use customer_repo::{CustomerRepository, VehicleRepository};
pub use error::{StoreError, StoreResult};
pub use shop_repo::{BayRepository, MechanicRepository, ServiceRepository};
