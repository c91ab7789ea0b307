// ==========================================
// 汽修车间预约排产系统 - 主数据实体与只读目录
// ==========================================
// 职责: 客户/车辆/服务/技师/工位的值对象定义与目录查找
// 约束: 实体为纯值记录,不持有任何数据库句柄
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Customer - 客户
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub tuid: i64,    // 数据库行ID
    pub name: String, // 客户姓名 (目录内唯一)
}

// ==========================================
// Vehicle - 车辆
// ==========================================
// 约束: (车主, 描述) 组合唯一,否则后续无法区分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub tuid: i64,           // 数据库行ID
    pub customer_tuid: i64,  // 车主的客户ID
    pub description: String, // 车辆描述
}

// ==========================================
// ServiceItem - 服务项目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceItem {
    pub tuid: i64,         // 数据库行ID
    pub name: String,      // 服务名称 (目录内唯一)
    pub duration_min: u32, // 工时 (分钟, 正整数)
}

// ==========================================
// Mechanic - 技师
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mechanic {
    pub tuid: i64,        // 数据库行ID
    pub name: String,     // 技师姓名
    pub hourly_rate: f64, // 时薪 (非负)
}

// ==========================================
// Bay - 检修工位
// ==========================================
// 工位号即排产优先级: 多名技师同一最早槽位时,工位号小者胜出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bay {
    pub tuid: i64,          // 工位号 (数据库行ID)
    pub mechanic_tuid: i64, // 所属技师ID
}

// ==========================================
// ShopCatalog - 只读目录
// ==========================================
// 会话启动时从数据库加载一次; 排产期间只读,
// 仅在新增客户/车辆落库成功后追加
#[derive(Debug, Clone, Default)]
pub struct ShopCatalog {
    pub customers: Vec<Customer>,
    pub vehicles: Vec<Vehicle>,
    pub services: Vec<ServiceItem>,
}

impl ShopCatalog {
    /// 按姓名查找客户
    pub fn find_customer_by_name(&self, name: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.name == name)
    }

    /// 按ID查找客户
    pub fn find_customer(&self, tuid: i64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.tuid == tuid)
    }

    /// 按ID查找车辆
    pub fn find_vehicle(&self, tuid: i64) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.tuid == tuid)
    }

    /// 按 (车主ID, 描述) 查找车辆
    pub fn find_vehicle_of_owner(&self, customer_tuid: i64, description: &str) -> Option<&Vehicle> {
        self.vehicles
            .iter()
            .find(|v| v.customer_tuid == customer_tuid && v.description == description)
    }

    /// 按名称查找服务项目
    pub fn find_service_by_name(&self, name: &str) -> Option<&ServiceItem> {
        self.services.iter().find(|s| s.name == name)
    }

    /// 按ID查找服务项目
    pub fn find_service(&self, tuid: i64) -> Option<&ServiceItem> {
        self.services.iter().find(|s| s.tuid == tuid)
    }

    /// 客户姓名是否已存在 (重复性检查)
    pub fn has_customer_named(&self, name: &str) -> bool {
        self.find_customer_by_name(name).is_some()
    }

    /// (车主, 描述) 组合是否已存在 (重复性检查)
    pub fn has_vehicle(&self, customer_tuid: i64, description: &str) -> bool {
        self.find_vehicle_of_owner(customer_tuid, description).is_some()
    }

    /// 落库成功后把新客户追加进目录
    pub fn push_customer(&mut self, customer: Customer) {
        self.customers.push(customer);
    }

    /// 落库成功后把新车辆追加进目录
    pub fn push_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.push(vehicle);
    }
}
