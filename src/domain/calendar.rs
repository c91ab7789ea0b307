// ==========================================
// 汽修车间预约排产系统 - 技师排班日历
// ==========================================
// 职责: 单名技师的占用网格, 索引为 (周, 工作日, 时隙)
// 不变量: 网格只增不减; 已占用的时隙不会被本引擎释放 (无取消功能)
// 不变量: 一个预约占用同一天内连续的一段时隙, 不跨天不跨周
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// MechanicCalendar - 占用网格
// ==========================================
// 周按需追加: 第0周为下周一起始的那一周
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanicCalendar {
    work_days: usize,               // 每周工作日数
    slots_per_day: usize,           // 每个工作日的时隙数
    weeks: Vec<Vec<Vec<bool>>>,     // [周][工作日][时隙] => 是否已占用
}

impl MechanicCalendar {
    /// 新建日历, 初始含第一周的空网格
    pub fn new(work_days: usize, slots_per_day: usize) -> Self {
        let mut calendar = Self {
            work_days,
            slots_per_day,
            weeks: Vec::new(),
        };
        calendar.add_week();
        calendar
    }

    /// 追加一个空白周
    pub fn add_week(&mut self) {
        self.weeks
            .push(vec![vec![false; self.slots_per_day]; self.work_days]);
    }

    /// 当前已分配的周数
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// 每个工作日的时隙数
    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }

    /// 每周工作日数
    pub fn work_days(&self) -> usize {
        self.work_days
    }

    /// 占用一个时隙; 目标周超出当前范围时自动补齐空白周
    ///
    /// 工作日/时隙下标由引擎保证在合法范围内, 此处不做越界防护
    pub fn reserve(&mut self, week: usize, day: usize, slot: usize) {
        while week >= self.week_count() {
            self.add_week();
        }
        self.weeks[week][day][slot] = true;
    }

    /// 查询时隙是否已占用
    ///
    /// 尚未分配的未来周视为整周空闲, 返回 false 而不报错
    pub fn is_occupied(&self, week: usize, day: usize, slot: usize) -> bool {
        if week >= self.week_count() {
            return false;
        }
        self.weeks[week][day][slot]
    }

    /// 指定周内已占用的时隙总数; 未分配的周返回 0
    pub fn reserved_count(&self, week: usize) -> usize {
        match self.weeks.get(week) {
            Some(days) => days
                .iter()
                .map(|slots| slots.iter().filter(|&&occupied| occupied).count())
                .sum(),
            None => 0,
        }
    }

    /// 深拷贝快照, 用于试探性占位
    ///
    /// 快照与原日历完全独立: 任一方的后续修改不影响另一方
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_calendar_has_one_empty_week() {
        let calendar = MechanicCalendar::new(5, 16);
        assert_eq!(calendar.week_count(), 1);
        assert_eq!(calendar.reserved_count(0), 0);
    }

    #[test]
    fn test_reserve_then_is_occupied() {
        let mut calendar = MechanicCalendar::new(5, 16);
        calendar.reserve(0, 2, 7);

        assert!(calendar.is_occupied(0, 2, 7));
        assert!(!calendar.is_occupied(0, 2, 6));
        assert!(!calendar.is_occupied(0, 3, 7));
    }

    #[test]
    fn test_unallocated_future_week_is_free() {
        let calendar = MechanicCalendar::new(5, 16);
        // 第3周尚未分配,视为空闲
        assert!(!calendar.is_occupied(3, 0, 0));
        assert_eq!(calendar.reserved_count(3), 0);
    }

    #[test]
    fn test_reserve_grows_weeks_on_demand() {
        let mut calendar = MechanicCalendar::new(5, 16);
        calendar.reserve(2, 4, 15);

        assert_eq!(calendar.week_count(), 3);
        assert!(calendar.is_occupied(2, 4, 15));
        // 中间补齐的周仍为空白
        assert_eq!(calendar.reserved_count(1), 0);
    }

    #[test]
    fn test_reserved_count_sums_whole_week() {
        let mut calendar = MechanicCalendar::new(5, 16);
        calendar.reserve(0, 0, 0);
        calendar.reserve(0, 0, 1);
        calendar.reserve(0, 4, 15);
        calendar.reserve(1, 0, 0);

        assert_eq!(calendar.reserved_count(0), 3);
        assert_eq!(calendar.reserved_count(1), 1);
    }

    #[test]
    fn test_snapshot_is_independent_both_ways() {
        let mut original = MechanicCalendar::new(5, 16);
        original.reserve(0, 0, 0);

        let mut snapshot = original.snapshot();
        assert!(snapshot.is_occupied(0, 0, 0));

        // 快照之后修改原日历,不影响快照
        original.reserve(0, 1, 3);
        assert!(!snapshot.is_occupied(0, 1, 3));

        // 修改快照,不影响原日历
        snapshot.reserve(0, 2, 5);
        assert!(!original.is_occupied(0, 2, 5));

        // 快照上补周也不影响原日历
        snapshot.reserve(4, 0, 0);
        assert_eq!(original.week_count(), 1);
        assert_eq!(snapshot.week_count(), 5);
    }
}
