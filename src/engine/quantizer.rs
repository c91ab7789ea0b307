// ==========================================
// 汽修车间预约排产系统 - 时隙量化器
// ==========================================
// 职责: 由服务目录推导共享时隙长度与每日时隙数
// 规则: 时隙长度 = 全部服务工时的最大公约数
// ==========================================

use crate::config::ShopConfig;
use crate::domain::catalog::ServiceItem;
use crate::engine::error::{ScheduleError, ScheduleResult};

// ==========================================
// TimeQuantizer - 时隙量化器
// ==========================================
// 每个会话计算一次; 服务目录会话期间只读, 无需中途重算
#[derive(Debug, Clone, Copy)]
pub struct TimeQuantizer {
    slot_size_min: u32, // 单个时隙的分钟数
    slots_per_day: u32, // 每个工作日的时隙数
}

impl TimeQuantizer {
    /// 由服务目录与营业配置推导量化参数
    ///
    /// # 返回
    /// - Err(ConfigurationFailure): 服务目录为空, 时隙长度无定义
    ///
    /// # 说明
    /// 每日时隙数按整数除法截断。工时不是时隙整数倍的服务同样
    /// 以整数除法折算时隙数, 与既有数据行为保持一致。
    pub fn from_services(services: &[ServiceItem], config: &ShopConfig) -> ScheduleResult<Self> {
        if services.is_empty() {
            return Err(ScheduleError::ConfigurationFailure {
                message: "服务目录为空, 无法确定时隙长度".to_string(),
            });
        }

        let mut slot_size_min = 0;
        for service in services {
            slot_size_min = gcd(slot_size_min, service.duration_min);
            // 公约数已到最小值, 提前结束
            if slot_size_min == 1 {
                break;
            }
        }

        Ok(Self {
            slot_size_min,
            slots_per_day: config.working_minutes_per_day() / slot_size_min,
        })
    }

    /// 单个时隙的分钟数
    pub fn slot_size_min(&self) -> u32 {
        self.slot_size_min
    }

    /// 每个工作日的时隙数
    pub fn slots_per_day(&self) -> u32 {
        self.slots_per_day
    }

    /// 指定服务需要占用的连续时隙数
    pub fn slots_needed(&self, service: &ServiceItem) -> usize {
        (service.duration_min / self.slot_size_min) as usize
    }
}

/// 两数最大公约数 (辗转相除)
fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while a != 0 {
        let next = b % a;
        b = a;
        a = next;
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(tuid: i64, duration_min: u32) -> ServiceItem {
        ServiceItem {
            tuid,
            name: format!("S{}", tuid),
            duration_min,
        }
    }

    #[test]
    fn test_gcd_of_30_60_90_is_30() {
        let services = vec![service(1, 30), service(2, 60), service(3, 90)];
        let quantizer = TimeQuantizer::from_services(&services, &ShopConfig::default())
            .expect("Failed to build quantizer");

        assert_eq!(quantizer.slot_size_min(), 30);
        // 8 小时 × 60 分 / 30 分 = 16 个时隙
        assert_eq!(quantizer.slots_per_day(), 16);
    }

    #[test]
    fn test_seeded_catalog_durations() {
        // 预置目录: 30/60/180/120/240 分钟
        let services = vec![
            service(1, 30),
            service(2, 60),
            service(3, 180),
            service(4, 120),
            service(5, 240),
        ];
        let quantizer = TimeQuantizer::from_services(&services, &ShopConfig::default())
            .expect("Failed to build quantizer");

        assert_eq!(quantizer.slot_size_min(), 30);
        assert_eq!(quantizer.slots_needed(&service(5, 240)), 8);
        assert_eq!(quantizer.slots_needed(&service(1, 30)), 1);
    }

    #[test]
    fn test_coprime_durations_short_circuit_to_one() {
        let services = vec![service(1, 7), service(2, 13), service(3, 240)];
        let quantizer = TimeQuantizer::from_services(&services, &ShopConfig::default())
            .expect("Failed to build quantizer");

        assert_eq!(quantizer.slot_size_min(), 1);
        assert_eq!(quantizer.slots_per_day(), 480);
    }

    #[test]
    fn test_empty_catalog_is_configuration_failure() {
        let result = TimeQuantizer::from_services(&[], &ShopConfig::default());
        assert!(matches!(
            result,
            Err(ScheduleError::ConfigurationFailure { .. })
        ));
    }
}
