// ==========================================
// 汽修车间预约排产系统 - 预约实体
// ==========================================
// 职责: 预约值记录与同车时间窗重叠判定
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Appointment - 预约
// ==========================================
// tuid 为 None 表示尚未落库; 落库后由数据库行ID回填
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub tuid: Option<i64>,          // 数据库行ID (未保存时为 None)
    pub vehicle_tuid: i64,          // 受检车辆ID
    pub bay_tuid: i64,              // 占用工位号
    pub service_tuid: i64,          // 服务项目ID
    pub start_time: NaiveDateTime,  // 预约开始时刻
    pub end_time: NaiveDateTime,    // 预约结束时刻
}

impl Appointment {
    /// 与给定时间窗是否重叠
    ///
    /// 半开区间判定: `self.start < end && self.end > start`。
    /// 首尾相接 (`self.end == start`) 不算重叠。
    pub fn overlaps_window(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_time < end && self.end_time > start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn appointment(start: NaiveDateTime, end: NaiveDateTime) -> Appointment {
        Appointment {
            tuid: Some(1),
            vehicle_tuid: 1,
            bay_tuid: 1,
            service_tuid: 1,
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_partial_overlap_detected() {
        // [10:00,11:00) 与 [10:30,11:30) 重叠
        let existing = appointment(ts(10, 0), ts(11, 0));
        assert!(existing.overlaps_window(ts(10, 30), ts(11, 30)));
    }

    #[test]
    fn test_touching_boundary_is_not_overlap() {
        // [9:00,10:00) 与 [10:00,11:00) 首尾相接,不算重叠
        let existing = appointment(ts(9, 0), ts(10, 0));
        assert!(!existing.overlaps_window(ts(10, 0), ts(11, 0)));
        // 反向相接同理
        assert!(!existing.overlaps_window(ts(8, 0), ts(9, 0)));
    }

    #[test]
    fn test_containment_is_overlap() {
        let existing = appointment(ts(9, 0), ts(12, 0));
        assert!(existing.overlaps_window(ts(10, 0), ts(10, 30)));
        assert!(existing.overlaps_window(ts(8, 0), ts(13, 0)));
    }
}
