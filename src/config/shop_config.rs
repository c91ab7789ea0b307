// ==========================================
// 汽修车间预约排产系统 - 车间营业配置
// ==========================================
// 职责: 配置加载与默认值管理
// 存储: config_kv 表 (key-value), 表不存在时全部取默认值
// ==========================================

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const WORK_DAYS_PER_WEEK: &str = "shop/work_days_per_week";
    pub const WORK_HOURS_PER_DAY: &str = "shop/work_hours_per_day";
    pub const OPENING_MINUTE_OF_DAY: &str = "shop/opening_minute_of_day";
    pub const LUNCH_MINUTE_OF_DAY: &str = "shop/lunch_minute_of_day";
    pub const LUNCH_LENGTH_MIN: &str = "shop/lunch_length_min";
}

// ==========================================
// ShopConfig - 车间营业配置
// ==========================================
// 默认营业参数: 周一至周五, 每天 8 小时, 08:00 开门, 12:00 午休 1 小时
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    pub work_days_per_week: usize,  // 每周工作日数
    pub work_hours_per_day: u32,    // 每日工时 (小时)
    pub opening_minute_of_day: u32, // 开门时刻 (当日第几分钟, 480 = 08:00)
    pub lunch_minute_of_day: u32,   // 午休开始时刻 (当日第几分钟, 720 = 12:00)
    pub lunch_length_min: u32,      // 午休时长 (分钟)
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            work_days_per_week: 5,
            work_hours_per_day: 8,
            opening_minute_of_day: 8 * 60,
            lunch_minute_of_day: 12 * 60,
            lunch_length_min: 60,
        }
    }
}

impl ShopConfig {
    /// 每个工作日的可排产分钟数
    pub fn working_minutes_per_day(&self) -> u32 {
        self.work_hours_per_day * 60
    }

    /// 从 config_kv 表加载配置, 缺失的键取默认值
    ///
    /// # 说明
    /// - config_kv 表不存在时直接返回全默认配置
    /// - 单个键解析失败时记录告警并退回该键的默认值
    pub fn load(conn: &Connection) -> Self {
        let defaults = Self::default();

        if !Self::kv_table_exists(conn) {
            return defaults;
        }

        Self {
            work_days_per_week: Self::read_value(
                conn,
                config_keys::WORK_DAYS_PER_WEEK,
                defaults.work_days_per_week,
            ),
            work_hours_per_day: Self::read_value(
                conn,
                config_keys::WORK_HOURS_PER_DAY,
                defaults.work_hours_per_day,
            ),
            opening_minute_of_day: Self::read_value(
                conn,
                config_keys::OPENING_MINUTE_OF_DAY,
                defaults.opening_minute_of_day,
            ),
            lunch_minute_of_day: Self::read_value(
                conn,
                config_keys::LUNCH_MINUTE_OF_DAY,
                defaults.lunch_minute_of_day,
            ),
            lunch_length_min: Self::read_value(
                conn,
                config_keys::LUNCH_LENGTH_MIN,
                defaults.lunch_length_min,
            ),
        }
    }

    fn kv_table_exists(conn: &Connection) -> bool {
        conn.query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='config_kv' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .unwrap_or(false)
    }

    /// 读取单个配置值, 缺失或解析失败时退回默认值
    fn read_value<T>(conn: &Connection, key: &str, default: T) -> T
    where
        T: std::str::FromStr + Copy,
    {
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .unwrap_or(None);

        match raw {
            Some(text) => match text.parse::<T>() {
                Ok(value) => value,
                Err(_) => {
                    warn!(key, raw = %text, "配置值解析失败, 使用默认值");
                    default
                }
            },
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_sqlite_connection;

    #[test]
    fn test_default_config() {
        let config = ShopConfig::default();
        assert_eq!(config.work_days_per_week, 5);
        assert_eq!(config.working_minutes_per_day(), 480);
        assert_eq!(config.opening_minute_of_day, 480);
        assert_eq!(config.lunch_minute_of_day, 720);
        assert_eq!(config.lunch_length_min, 60);
    }

    #[test]
    fn test_load_without_kv_table_falls_back_to_defaults() {
        let conn = open_sqlite_connection(":memory:").expect("Failed to open connection");
        let config = ShopConfig::load(&conn);
        assert_eq!(config, ShopConfig::default());
    }

    #[test]
    fn test_load_with_overrides() {
        let conn = open_sqlite_connection(":memory:").expect("Failed to open connection");
        conn.execute_batch(
            r#"
            CREATE TABLE config_kv (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );
            INSERT INTO config_kv (key, value) VALUES ('shop/work_hours_per_day', '6');
            INSERT INTO config_kv (key, value) VALUES ('shop/lunch_length_min', '30');
            "#,
        )
        .expect("Failed to seed config");

        let config = ShopConfig::load(&conn);
        assert_eq!(config.work_hours_per_day, 6);
        assert_eq!(config.working_minutes_per_day(), 360);
        assert_eq!(config.lunch_length_min, 30);
        // 未覆写的键保持默认
        assert_eq!(config.work_days_per_week, 5);
    }

    #[test]
    fn test_load_with_garbage_value_keeps_default() {
        let conn = open_sqlite_connection(":memory:").expect("Failed to open connection");
        conn.execute_batch(
            r#"
            CREATE TABLE config_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL);
            INSERT INTO config_kv (key, value) VALUES ('shop/work_hours_per_day', 'eight');
            "#,
        )
        .expect("Failed to seed config");

        let config = ShopConfig::load(&conn);
        assert_eq!(config.work_hours_per_day, 8);
    }
}
