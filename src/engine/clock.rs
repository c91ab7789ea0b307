// ==========================================
// 汽修车间预约排产系统 - 排产时钟
// ==========================================
// 职责: 槽位坐标 (周,工作日,时隙) 与墙钟时刻的换算
// 规则: 第0周从会话当日之后的下一个周一开始; 落在午休或其后的
//       时刻向后平移午休时长 (纯时间戳变换, 占用网格不感知午休)
// ==========================================

use crate::config::ShopConfig;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

// ==========================================
// ShopClock - 排产时钟
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ShopClock {
    epoch: NaiveDateTime,    // 下周一开门时刻, 即 (0,0,0) 槽位的原始起点
    lunch_start_min: u32,    // 午休开始时刻 (当日第几分钟)
    lunch_length_min: u32,   // 午休时长 (分钟)
}

impl ShopClock {
    /// 以 today 为基准建立时钟; 排班从 today 之后的下一个周一开始
    pub fn new(today: NaiveDate, config: &ShopConfig) -> Self {
        Self {
            epoch: next_monday_opening(today, config),
            lunch_start_min: config.lunch_minute_of_day,
            lunch_length_min: config.lunch_length_min,
        }
    }

    /// 排班起点: 下周一的开门时刻
    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }

    /// 槽位坐标对应的原始开始时刻 (未做午休平移)
    pub fn slot_start(&self, week: usize, day: usize, slot: usize, slot_size_min: u32) -> NaiveDateTime {
        self.epoch
            + Duration::weeks(week as i64)
            + Duration::days(day as i64)
            + Duration::minutes(slot as i64 * slot_size_min as i64)
    }

    /// 计算预约的最终起止时刻 (含午休平移)
    ///
    /// 平移规则:
    /// - 开始时刻落在午休开始或其后 => 向后平移午休时长
    /// - 结束时刻严格晚于午休开始 => 向后平移午休时长
    /// 两条规则各自独立作用于平移前的原始时刻。
    /// 原始时间窗横跨午休边界的服务不做槽位级保护, 仅平移展示时刻。
    pub fn appointment_window(
        &self,
        week: usize,
        day: usize,
        slot: usize,
        slot_size_min: u32,
        duration_min: u32,
    ) -> (NaiveDateTime, NaiveDateTime) {
        let raw_start = self.slot_start(week, day, slot, slot_size_min);
        let raw_end = raw_start + Duration::minutes(duration_min as i64);

        let end = self.offset_lunch(raw_end, false);
        let start = self.offset_lunch(raw_start, true);
        (start, end)
    }

    /// 落在午休窗口影响范围内的时刻向后平移午休时长
    ///
    /// 开始时刻按 `>=` 判定, 结束时刻按 `>` 判定 (正好结束于午休
    /// 开始时刻的预约不受影响)
    fn offset_lunch(&self, ts: NaiveDateTime, is_start: bool) -> NaiveDateTime {
        let minute_of_day = ts.time().num_seconds_from_midnight() / 60;
        let shifted = if is_start {
            minute_of_day >= self.lunch_start_min
        } else {
            minute_of_day > self.lunch_start_min
        };

        if shifted {
            ts + Duration::minutes(self.lunch_length_min as i64)
        } else {
            ts
        }
    }
}

/// today 之后的下一个周一的开门时刻
///
/// today 本身是周一时仍取下一周的周一, 当周不再安排
pub fn next_monday_opening(today: NaiveDate, config: &ShopConfig) -> NaiveDateTime {
    let days_ahead = 7 - today.weekday().num_days_from_monday() as i64;
    let monday = today + Duration::days(days_ahead);
    monday.and_time(NaiveTime::MIN) + Duration::minutes(config.opening_minute_of_day as i64)
}
