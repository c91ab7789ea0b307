// ==========================================
// 汽修车间预约排产系统 - 表现层
// ==========================================
// 职责: 汇整已提交预约与周薪数据, 负责全部文本格式化
// 红线: 不含排产逻辑, 只消费引擎输出
// ==========================================

pub mod schedule_report;

// 重导出
pub use schedule_report::{
    sort_appointments_by_time, sort_appointments_by_tuid, MechanicSection, ScheduleReport,
    ScheduleRow, WeekPay,
};
