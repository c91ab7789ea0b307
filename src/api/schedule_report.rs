// ==========================================
// 汽修车间预约排产系统 - 排班与周薪报表
// ==========================================
// 职责: 把预约清单与周薪序列汇整成逐技师的展示结构
// 输出: 固定列宽文本 (与请求文件同一套命令行交互), 或 JSON
// ==========================================

use crate::domain::appointment::Appointment;
use crate::domain::catalog::ShopCatalog;
use crate::engine::error::{ScheduleError, ScheduleResult};
use crate::engine::payroll::MechanicPaycheck;
use crate::engine::scheduler::RosterEntry;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// 展示列头
const HEADERS: [&str; 6] = [
    "Bay Number",
    "Customer Name",
    "Vehicle Description",
    "Service",
    "Start Date & Time",
    "End Date & Time",
];

/// 时间戳展示格式
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// 报表结构
// ==========================================

/// 单条预约的展示行
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRow {
    pub bay_tuid: i64,
    pub customer_name: String,
    pub vehicle_description: String,
    pub service_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// 周薪展示条目 (仅非零周, 周号从 1 起)
#[derive(Debug, Clone, Serialize)]
pub struct WeekPay {
    pub week_no: usize,
    pub amount: f64,
}

/// 单名技师的报表分节
#[derive(Debug, Clone, Serialize)]
pub struct MechanicSection {
    pub mechanic_name: String,
    pub bay_tuid: i64,
    pub rows: Vec<ScheduleRow>,
    pub paychecks: Vec<WeekPay>,
}

/// 完整排班报表
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub sections: Vec<MechanicSection>,
}

impl ScheduleReport {
    /// 汇整报表: 逐技师收集其工位上的预约 (按开始时刻升序) 与非零周薪
    pub fn build(
        catalog: &ShopCatalog,
        roster: &[RosterEntry],
        appointments: &[Appointment],
        paychecks: &[MechanicPaycheck],
    ) -> ScheduleResult<Self> {
        let mut sorted = appointments.to_vec();
        sort_appointments_by_time(&mut sorted);

        let mut sections = Vec::with_capacity(roster.len());
        for entry in roster {
            let mut rows = Vec::new();
            for appointment in sorted.iter().filter(|a| a.bay_tuid == entry.bay.tuid) {
                let vehicle = catalog
                    .find_vehicle(appointment.vehicle_tuid)
                    .ok_or_else(|| {
                        ScheduleError::lookup("vehicle", appointment.vehicle_tuid.to_string())
                    })?;
                let owner = catalog.find_customer(vehicle.customer_tuid).ok_or_else(|| {
                    ScheduleError::lookup("customer", vehicle.customer_tuid.to_string())
                })?;
                let service = catalog
                    .find_service(appointment.service_tuid)
                    .ok_or_else(|| {
                        ScheduleError::lookup("service", appointment.service_tuid.to_string())
                    })?;

                rows.push(ScheduleRow {
                    bay_tuid: appointment.bay_tuid,
                    customer_name: owner.name.clone(),
                    vehicle_description: vehicle.description.clone(),
                    service_name: service.name.clone(),
                    start_time: appointment.start_time,
                    end_time: appointment.end_time,
                });
            }

            // 零薪周不进报表, 由此处约定而非计算器裁剪
            let week_pays: Vec<WeekPay> = paychecks
                .iter()
                .find(|p| p.mechanic_tuid == entry.mechanic.tuid)
                .map(|p| {
                    p.weekly_wages
                        .iter()
                        .enumerate()
                        .filter(|(_, &amount)| amount != 0.0)
                        .map(|(week, &amount)| WeekPay {
                            week_no: week + 1,
                            amount,
                        })
                        .collect()
                })
                .unwrap_or_default();

            sections.push(MechanicSection {
                mechanic_name: entry.mechanic.name.clone(),
                bay_tuid: entry.bay.tuid,
                rows,
                paychecks: week_pays,
            });
        }

        Ok(Self { sections })
    }

    /// JSON 形式 (供外部工具消费)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Appointment Schedule")?;
        for section in &self.sections {
            writeln!(f, "{}'s Schedule", section.mechanic_name)?;
            writeln!(
                f,
                "{:<10}{:>15}{:>25}{:>35}{:>30}{:>30}",
                HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3], HEADERS[4], HEADERS[5]
            )?;
            for row in &section.rows {
                writeln!(
                    f,
                    "{:<10}{:>15}{:>25}{:>35}{:>30}{:>30}",
                    row.bay_tuid,
                    row.customer_name,
                    row.vehicle_description,
                    row.service_name,
                    row.start_time.format(TIME_FORMAT).to_string(),
                    row.end_time.format(TIME_FORMAT).to_string(),
                )?;
            }
            writeln!(f, "Paychecks: ")?;
            for pay in &section.paychecks {
                writeln!(f, "Week {}: ${:.2}", pay.week_no, pay.amount)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ==========================================
// 排序辅助
// ==========================================

/// 按开始时刻升序排序
pub fn sort_appointments_by_time(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|a| a.start_time);
}

/// 按行ID升序排序 (即预订顺序)
pub fn sort_appointments_by_tuid(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|a| a.tuid);
}
