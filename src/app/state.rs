// ==========================================
// 汽修车间预约排产系统 - 会话状态
// ==========================================
// 职责: 打开数据库、预置主数据、加载目录、装配引擎、启动回放
// 说明: 显式构造的会话对象, 存储句柄在启动时注入一次,
//       不使用进程级单例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::info;

use crate::api::ScheduleReport;
use crate::config::ShopConfig;
use crate::db::open_sqlite_connection;
use crate::domain::appointment::Appointment;
use crate::domain::catalog::{Customer, ShopCatalog, Vehicle};
use crate::engine::clock::ShopClock;
use crate::engine::error::{ScheduleError, ScheduleResult};
use crate::engine::payroll::PayrollCalculator;
use crate::engine::quantizer::TimeQuantizer;
use crate::engine::scheduler::SchedulingEngine;
use crate::importer::request_parser::RequestOp;
use crate::repository::error::StoreError;
use crate::repository::{
    AppointmentRepository, BayRepository, CustomerRepository, MechanicRepository,
    ServiceRepository, VehicleRepository,
};

// ==========================================
// ShopSession - 排产会话
// ==========================================
// 单线程会话: 请求逐个处理, 日历与目录无并发访问
pub struct ShopSession {
    db_path: String,
    config: ShopConfig,
    catalog: ShopCatalog,
    engine: SchedulingEngine,
    customer_repo: Arc<CustomerRepository>,
    vehicle_repo: Arc<VehicleRepository>,
}

impl ShopSession {
    /// 打开 (必要时建库并预置) 数据库, 装配完整会话
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - today: 会话基准日; 排班从其后的下一个周一开始
    ///
    /// # 说明
    /// 该方法会:
    /// 1. 初始化全部 Repository (建表幂等)
    /// 2. 首次建库时预置技师/服务/工位主数据
    /// 3. 加载只读目录与既有预约
    /// 4. 装配排产引擎并回放未来预约, 对齐内存与持久状态
    pub fn open(db_path: &str, today: NaiveDate) -> ScheduleResult<Self> {
        info!(db_path, "正在初始化排产会话");

        let conn = open_sqlite_connection(db_path)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化 Repository 层
        // ==========================================
        let customer_repo = Arc::new(CustomerRepository::from_connection(conn.clone())?);
        let vehicle_repo = Arc::new(VehicleRepository::from_connection(conn.clone())?);
        let mechanic_repo = Arc::new(MechanicRepository::from_connection(conn.clone())?);
        let bay_repo = Arc::new(BayRepository::from_connection(conn.clone())?);
        let service_repo = Arc::new(ServiceRepository::from_connection(conn.clone())?);
        let appointment_repo = Arc::new(AppointmentRepository::from_connection(conn.clone())?);

        // 首次建库: 预置车间主数据
        if mechanic_repo.is_empty()? {
            seed_master_data(&mechanic_repo, &service_repo, &bay_repo)?;
            info!("数据库已预置默认主数据");
        }

        // 营业配置 (config_kv 可覆写, 无表则全默认)
        let config = {
            let guard = conn
                .lock()
                .map_err(|e| StoreError::Lock(e.to_string()))?;
            ShopConfig::load(&guard)
        };

        // ==========================================
        // 加载只读目录与既有预约
        // ==========================================
        let catalog = ShopCatalog {
            customers: customer_repo.list_all()?,
            vehicles: vehicle_repo.list_all()?,
            services: service_repo.list_all()?,
        };
        let mechanics = mechanic_repo.list_all()?;
        let bays = bay_repo.list_all()?;
        let persisted = appointment_repo.list_all()?;

        // ==========================================
        // 装配引擎并回放
        // ==========================================
        let quantizer = TimeQuantizer::from_services(&catalog.services, &config)?;
        let clock = ShopClock::new(today, &config);
        let mut engine = SchedulingEngine::new(
            mechanics,
            bays,
            persisted,
            quantizer,
            clock,
            &config,
            appointment_repo,
        )?;
        engine.replay_persisted(&catalog)?;

        info!(
            slot_size_min = quantizer.slot_size_min(),
            slots_per_day = quantizer.slots_per_day(),
            epoch = %clock.epoch(),
            "排产会话就绪"
        );

        Ok(Self {
            db_path: db_path.to_string(),
            config,
            catalog,
            engine,
            customer_repo,
            vehicle_repo,
        })
    }

    // ==========================================
    // 请求操作
    // ==========================================

    /// 新增客户
    ///
    /// # 返回
    /// - Err(DuplicateEntity): 同名客户已存在 (车辆按客户名录入,
    ///   重名将无法区分)
    pub fn add_customer(&mut self, name: &str) -> ScheduleResult<Customer> {
        if self.catalog.has_customer_named(name) {
            return Err(ScheduleError::DuplicateEntity {
                message: format!("客户 {} 已存在, 车辆按客户名录入, 不允许重名", name),
            });
        }

        let tuid = self.customer_repo.insert(name)?;
        let customer = Customer {
            tuid,
            name: name.to_string(),
        };
        self.catalog.push_customer(customer.clone());
        info!(tuid, name, "新增客户");
        Ok(customer)
    }

    /// 新增车辆
    ///
    /// # 返回
    /// - Err(LookupFailure): 车主不存在
    /// - Err(DuplicateEntity): 同车主同描述的车辆已存在, 无法区分
    pub fn add_vehicle(
        &mut self,
        customer_name: &str,
        description: &str,
    ) -> ScheduleResult<Vehicle> {
        let owner_tuid = self
            .catalog
            .find_customer_by_name(customer_name)
            .map(|c| c.tuid)
            .ok_or_else(|| ScheduleError::lookup("customer", customer_name))?;

        if self.catalog.has_vehicle(owner_tuid, description) {
            return Err(ScheduleError::DuplicateEntity {
                message: format!(
                    "客户 {} 已有同描述车辆 {}, 新记录无法与其区分",
                    customer_name, description
                ),
            });
        }

        let tuid = self.vehicle_repo.insert(owner_tuid, description)?;
        let vehicle = Vehicle {
            tuid,
            customer_tuid: owner_tuid,
            description: description.to_string(),
        };
        self.catalog.push_vehicle(vehicle.clone());
        info!(tuid, customer_name, description, "新增车辆");
        Ok(vehicle)
    }

    /// 请求预约: 交给引擎寻找最早可用槽位并提交
    pub fn request_appointment(
        &mut self,
        customer_name: &str,
        vehicle_description: &str,
        service_name: &str,
    ) -> ScheduleResult<Appointment> {
        self.engine.schedule_appointment(
            &self.catalog,
            None,
            customer_name,
            vehicle_description,
            service_name,
        )
    }

    /// 执行一条请求文件操作
    pub fn apply(&mut self, op: &RequestOp) -> ScheduleResult<()> {
        match op {
            RequestOp::AddCustomer { customer_name } => {
                self.add_customer(customer_name)?;
            }
            RequestOp::AddVehicle {
                customer_name,
                vehicle_description,
            } => {
                self.add_vehicle(customer_name, vehicle_description)?;
            }
            RequestOp::RequestAppointment {
                customer_name,
                vehicle_description,
                service_name,
            } => {
                self.request_appointment(customer_name, vehicle_description, service_name)?;
            }
        }
        Ok(())
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 已提交的全部预约
    pub fn appointments(&self) -> &[Appointment] {
        self.engine.appointments()
    }

    /// 汇整排班与周薪报表
    pub fn schedule_report(&self) -> ScheduleResult<ScheduleReport> {
        let payroll = PayrollCalculator::new(self.engine.quantizer().slot_size_min());
        let paychecks = payroll.weekly_report(self.engine.roster(), self.engine.calendars());
        ScheduleReport::build(
            &self.catalog,
            self.engine.roster(),
            self.engine.appointments(),
            &paychecks,
        )
    }

    /// 营业配置
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// 数据库路径
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    // ==========================================
    // 收尾
    // ==========================================

    /// 关闭会话并删除数据库文件
    pub fn drop_database(self) -> std::io::Result<()> {
        let path = self.db_path.clone();
        // 先释放全部连接引用, 再删除文件
        drop(self);
        std::fs::remove_file(path)
    }
}

/// 首次建库预置: 技师两名、服务目录五项、工位两个
///
/// 工位号由插入顺序决定: Sue 占 1 号 (高优先级), Steve 占 2 号
fn seed_master_data(
    mechanic_repo: &MechanicRepository,
    service_repo: &ServiceRepository,
    bay_repo: &BayRepository,
) -> ScheduleResult<()> {
    let sue = mechanic_repo.insert("Sue", 10.00)?;
    let steve = mechanic_repo.insert("Steve", 9.00)?;

    service_repo.insert("Oil Change", 30)?;
    service_repo.insert("Tire Replacement", 60)?;
    service_repo.insert("Brakes", 180)?;
    service_repo.insert("Transmission Filter Replacement", 120)?;
    service_repo.insert("Cooling System Cleaning", 240)?;

    bay_repo.insert(sue)?;
    bay_repo.insert(steve)?;
    Ok(())
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 说明
/// - 环境变量 REPAIR_SHOP_APS_DB_PATH 可显式指定 (便于调试/测试/CI)
/// - 否则使用用户数据目录下的 repair-shop-aps/repair_shop_aps.db
/// - 拿不到用户数据目录时回退为当前目录下的 repair_shop_aps.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("REPAIR_SHOP_APS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./repair_shop_aps.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("repair-shop-aps");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("repair_shop_aps.db");
        }
    }

    path.to_string_lossy().to_string()
}
