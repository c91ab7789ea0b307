// ==========================================
// 汽修车间预约排产系统 - 排产引擎
// ==========================================
// 职责: 跨技师最早槽位搜索, 同车冲突试探性改排, 提交与落库
// 规则: 先到先得; 预约必须当日完工; 同一最早槽位低工位号优先;
//       同一辆车不允许两个时间窗重叠的预约
// ==========================================

use crate::config::ShopConfig;
use crate::domain::appointment::Appointment;
use crate::domain::calendar::MechanicCalendar;
use crate::domain::catalog::{Bay, Mechanic, ShopCatalog};
use crate::engine::clock::ShopClock;
use crate::engine::error::{ScheduleError, ScheduleResult};
use crate::engine::quantizer::TimeQuantizer;
use crate::repository::appointment_repo::AppointmentRepository;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// RosterEntry - 排班花名册条目
// ==========================================
// 技师与其工位的配对; 花名册按工位号升序, 即优先级顺序
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub mechanic: Mechanic,
    pub bay: Bay,
}

/// 一次搜索命中的槽位坐标
#[derive(Debug, Clone, Copy)]
struct SlotPos {
    mechanic_idx: usize,
    week: usize,
    day: usize,
    slot: usize,
}

// ==========================================
// SchedulingEngine - 排产引擎
// ==========================================
// 单线程单执行者: 请求逐个处理到完成, 日历不存在并发访问
pub struct SchedulingEngine {
    quantizer: TimeQuantizer,
    clock: ShopClock,
    roster: Vec<RosterEntry>,
    calendars: Vec<MechanicCalendar>,
    appointments: Vec<Appointment>,
    appointment_repo: Arc<AppointmentRepository>,
}

impl SchedulingEngine {
    /// 组装排产引擎
    ///
    /// # 参数
    /// - mechanics/bays: 车间主数据; 每名技师必须有且仅有一个工位
    /// - persisted: 数据库中的既有预约 (按行ID升序)
    ///
    /// # 返回
    /// - Err(ConfigurationFailure): 技师名单为空, 或某技师没有工位
    pub fn new(
        mechanics: Vec<Mechanic>,
        bays: Vec<Bay>,
        persisted: Vec<Appointment>,
        quantizer: TimeQuantizer,
        clock: ShopClock,
        config: &ShopConfig,
        appointment_repo: Arc<AppointmentRepository>,
    ) -> ScheduleResult<Self> {
        if mechanics.is_empty() {
            return Err(ScheduleError::ConfigurationFailure {
                message: "技师名单为空, 无法排产".to_string(),
            });
        }

        let mut roster = Vec::with_capacity(mechanics.len());
        for mechanic in mechanics {
            let bay = bays
                .iter()
                .find(|b| b.mechanic_tuid == mechanic.tuid)
                .cloned()
                .ok_or_else(|| ScheduleError::ConfigurationFailure {
                    message: format!("技师 {} 没有分配工位", mechanic.name),
                })?;
            roster.push(RosterEntry { mechanic, bay });
        }
        // 按工位号升序: 最早槽位平局时, 先遍历到的低工位号胜出
        roster.sort_by_key(|entry| entry.bay.tuid);

        let work_days = config.work_days_per_week;
        let slots_per_day = quantizer.slots_per_day() as usize;
        let calendars = roster
            .iter()
            .map(|_| MechanicCalendar::new(work_days, slots_per_day))
            .collect();

        Ok(Self {
            quantizer,
            clock,
            roster,
            calendars,
            appointments: persisted,
            appointment_repo,
        })
    }

    /// 安排一次预约并提交到日历
    ///
    /// # 参数
    /// - existing_tuid: 既有预约的行ID (启动回放场景); 新预约传 None。
    ///   回放时该ID会把预约自身从同车重叠检查中排除, 且不再写库。
    ///
    /// # 返回
    /// 已提交日历、带最终起止时刻的预约记录
    pub fn schedule_appointment(
        &mut self,
        catalog: &ShopCatalog,
        existing_tuid: Option<i64>,
        customer_name: &str,
        vehicle_description: &str,
        service_name: &str,
    ) -> ScheduleResult<Appointment> {
        // 步骤1: 解析引用 (查找全部在占用任何时隙之前完成)
        let customer = catalog
            .find_customer_by_name(customer_name)
            .ok_or_else(|| ScheduleError::lookup("customer", customer_name))?;
        let vehicle = catalog
            .find_vehicle_of_owner(customer.tuid, vehicle_description)
            .ok_or_else(|| {
                ScheduleError::lookup(
                    "vehicle",
                    format!("{} / {}", customer_name, vehicle_description),
                )
            })?;
        let service = catalog
            .find_service_by_name(service_name)
            .ok_or_else(|| ScheduleError::lookup("service", service_name))?;

        let vehicle_tuid = vehicle.tuid;
        let service_tuid = service.tuid;
        let duration_min = service.duration_min;

        // 步骤2: 服务折算为连续时隙数, 跨技师搜索最早可用槽位
        let slots_needed = self.quantizer.slots_needed(service);
        let slot_size_min = self.quantizer.slot_size_min();

        let mut pos = Self::find_earliest(&mut self.calendars, slots_needed);
        let (mut start, mut end) =
            self.clock
                .appointment_window(pos.week, pos.day, pos.slot, slot_size_min, duration_min);

        // 步骤3: 同车重叠守卫
        // 命中重叠时在全体日历的快照上做试探性占位: 每轮只封锁被否决
        // 位置的起始时隙, 再重新搜索, 直到找到无冲突槽位。
        // 真实日历在整个循环中保持不变。
        if self.has_overlap(existing_tuid, vehicle_tuid, start, end) {
            debug!(
                vehicle_tuid,
                start = %start,
                "同车时间窗冲突, 进入试探性改排"
            );
            let mut trial: Vec<MechanicCalendar> = self
                .calendars
                .iter()
                .map(MechanicCalendar::snapshot)
                .collect();
            loop {
                trial[pos.mechanic_idx].reserve(pos.week, pos.day, pos.slot);
                pos = Self::find_earliest(&mut trial, slots_needed);
                let window = self.clock.appointment_window(
                    pos.week,
                    pos.day,
                    pos.slot,
                    slot_size_min,
                    duration_min,
                );
                start = window.0;
                end = window.1;
                if !self.has_overlap(existing_tuid, vehicle_tuid, start, end) {
                    break;
                }
            }
        }

        // 步骤4: 提交 - 在胜出技师的真实日历上占满整段连续时隙
        for offset in 0..slots_needed {
            self.calendars[pos.mechanic_idx].reserve(pos.week, pos.day, pos.slot + offset);
        }

        let entry = &self.roster[pos.mechanic_idx];
        let mut appointment = Appointment {
            tuid: existing_tuid,
            vehicle_tuid,
            bay_tuid: entry.bay.tuid,
            service_tuid,
            start_time: start,
            end_time: end,
        };

        // 步骤5: 新预约落库取得行ID; 回放的预约已在库中, 不再写
        if appointment.tuid.is_none() {
            let tuid = self.appointment_repo.insert(&appointment)?;
            appointment.tuid = Some(tuid);
            self.appointments.push(appointment.clone());
            info!(
                tuid,
                bay = appointment.bay_tuid,
                start = %appointment.start_time,
                end = %appointment.end_time,
                "预约已提交"
            );
        } else {
            debug!(
                tuid = ?appointment.tuid,
                bay = appointment.bay_tuid,
                "回放既有预约完成"
            );
        }

        Ok(appointment)
    }

    /// 启动回放: 把数据库中尚未开始的预约按原预订顺序重演进日历
    ///
    /// 每条预约以自身行ID作为 existing_tuid 重走排产流程, 既不会
    /// 触发对自己的重叠误报, 也不会重复落库。
    ///
    /// # 返回
    /// 回放的预约条数
    pub fn replay_persisted(&mut self, catalog: &ShopCatalog) -> ScheduleResult<usize> {
        let epoch = self.clock.epoch();

        let mut pending = Vec::new();
        for appointment in &self.appointments {
            if appointment.start_time < epoch {
                continue;
            }
            let Some(tuid) = appointment.tuid else {
                continue;
            };
            let vehicle = catalog
                .find_vehicle(appointment.vehicle_tuid)
                .ok_or_else(|| {
                    ScheduleError::lookup("vehicle", appointment.vehicle_tuid.to_string())
                })?;
            let customer = catalog.find_customer(vehicle.customer_tuid).ok_or_else(|| {
                ScheduleError::lookup("customer", vehicle.customer_tuid.to_string())
            })?;
            let service = catalog
                .find_service(appointment.service_tuid)
                .ok_or_else(|| {
                    ScheduleError::lookup("service", appointment.service_tuid.to_string())
                })?;
            pending.push((
                tuid,
                customer.name.clone(),
                vehicle.description.clone(),
                service.name.clone(),
            ));
        }
        // 回放顺序 = 行ID升序 = 当初的预订顺序, 以复现相同的排班
        pending.sort_by_key(|(tuid, _, _, _)| *tuid);

        for (tuid, customer_name, vehicle_description, service_name) in &pending {
            self.schedule_appointment(
                catalog,
                Some(*tuid),
                customer_name,
                vehicle_description,
                service_name,
            )?;
        }

        if !pending.is_empty() {
            info!(replayed = pending.len(), "启动回放完成, 日历已对齐持久状态");
        }
        Ok(pending.len())
    }

    // ==========================================
    // 内部搜索
    // ==========================================

    /// 跨技师取全局最早槽位
    ///
    /// 按 (周, 工作日, 时隙) 字典序取最小; 严格更早才替换当前最优,
    /// 平局保留先遍历到的条目, 花名册有序性保证低工位号优先
    fn find_earliest(calendars: &mut [MechanicCalendar], slots_needed: usize) -> SlotPos {
        let (week, day, slot) = Self::earliest_for(&mut calendars[0], slots_needed);
        let mut best = SlotPos {
            mechanic_idx: 0,
            week,
            day,
            slot,
        };

        for idx in 1..calendars.len() {
            let (week, day, slot) = Self::earliest_for(&mut calendars[idx], slots_needed);
            let earlier = week < best.week
                || (week == best.week && day < best.day)
                || (week == best.week && day == best.day && slot < best.slot);
            if earlier {
                best = SlotPos {
                    mechanic_idx: idx,
                    week,
                    day,
                    slot,
                };
            }
        }
        best
    }

    /// 单名技师日历上的最早可用槽位
    ///
    /// 逐周逐日逐隙扫描, 要求整段连续时隙落在同一天内; 当前范围内
    /// 无解时追加空白周继续, 新周整周空闲, 必然在有限步内命中
    fn earliest_for(calendar: &mut MechanicCalendar, slots_needed: usize) -> (usize, usize, usize) {
        let work_days = calendar.work_days();
        let slots_per_day = calendar.slots_per_day();

        let mut week = 0;
        loop {
            for day in 0..work_days {
                for slot in 0..slots_per_day {
                    // 当天剩余时隙不足以完工, 换下一天
                    if slot + slots_needed > slots_per_day {
                        break;
                    }
                    let run_free =
                        (0..slots_needed).all(|k| !calendar.is_occupied(week, day, slot + k));
                    if run_free {
                        return (week, day, slot);
                    }
                }
            }
            week += 1;
            if calendar.week_count() == week {
                calendar.add_week();
            }
        }
    }

    /// 该车是否已有与给定时间窗重叠的其他预约
    ///
    /// existing_tuid 用于把回放中的预约自身排除在外
    fn has_overlap(
        &self,
        existing_tuid: Option<i64>,
        vehicle_tuid: i64,
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    ) -> bool {
        self.appointments.iter().any(|a| {
            a.vehicle_tuid == vehicle_tuid
                && a.tuid != existing_tuid
                && a.overlaps_window(start, end)
        })
    }

    // ==========================================
    // 只读访问
    // ==========================================

    /// 已提交的全部预约 (含会话启动时载入的既有预约)
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// 排班花名册 (工位号升序)
    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    /// 各技师日历, 与花名册同序
    pub fn calendars(&self) -> &[MechanicCalendar] {
        &self.calendars
    }

    /// 时隙量化参数
    pub fn quantizer(&self) -> &TimeQuantizer {
        &self.quantizer
    }

    /// 排产时钟
    pub fn clock(&self) -> &ShopClock {
        &self.clock
    }
}
