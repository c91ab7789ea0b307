// ==========================================
// 汽修车间预约排产系统 - 周薪计算器
// ==========================================
// 职责: 由日历占用时隙数折算各技师每周工资
// 规则: 无预约的周不发底薪, 周薪恰好为 0
// ==========================================

use crate::domain::calendar::MechanicCalendar;
use crate::engine::scheduler::RosterEntry;
use serde::Serialize;

// ==========================================
// MechanicPaycheck - 单名技师的周薪序列
// ==========================================
// weekly_wages[w] 对应第 w 周 (第0周 = 下周一起始的那一周)
#[derive(Debug, Clone, Serialize)]
pub struct MechanicPaycheck {
    pub mechanic_tuid: i64,
    pub mechanic_name: String,
    pub bay_tuid: i64,
    pub weekly_wages: Vec<f64>,
}

// ==========================================
// PayrollCalculator - 周薪计算器
// ==========================================
// 排产完成后独立查询, 只读取日历终态
#[derive(Debug, Clone, Copy)]
pub struct PayrollCalculator {
    slot_size_min: u32,
}

impl PayrollCalculator {
    pub fn new(slot_size_min: u32) -> Self {
        Self { slot_size_min }
    }

    /// 指定周的工资: 时薪 / 60 × 时隙分钟数 × 已占用时隙数
    pub fn weekly_wage(&self, calendar: &MechanicCalendar, week: usize, hourly_rate: f64) -> f64 {
        hourly_rate / 60.0 * self.slot_size_min as f64 * calendar.reserved_count(week) as f64
    }

    /// 全体技师的周薪报表
    ///
    /// 周数取全体日历中的最大周数, 保证各技师的序列等长;
    /// 没有预约的周金额为 0, 是否展示由表现层决定
    pub fn weekly_report(
        &self,
        roster: &[RosterEntry],
        calendars: &[MechanicCalendar],
    ) -> Vec<MechanicPaycheck> {
        let max_weeks = calendars
            .iter()
            .map(MechanicCalendar::week_count)
            .max()
            .unwrap_or(0);

        roster
            .iter()
            .zip(calendars.iter())
            .map(|(entry, calendar)| MechanicPaycheck {
                mechanic_tuid: entry.mechanic.tuid,
                mechanic_name: entry.mechanic.name.clone(),
                bay_tuid: entry.bay.tuid,
                weekly_wages: (0..max_weeks)
                    .map(|week| self.weekly_wage(calendar, week, entry.mechanic.hourly_rate))
                    .collect(),
            })
            .collect()
    }
}
