// ==========================================
// 汽修车间预约排产系统 - 预约仓储
// ==========================================
// 职责: 管理 appointments 表
// 说明: 只有插入与整表读取; 引擎不支持取消或改约, 故无更新/删除
// ==========================================

use crate::domain::appointment::Appointment;
use crate::repository::error::{StoreError, StoreResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// AppointmentRepository - 预约仓储
// ==========================================
pub struct AppointmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AppointmentRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> StoreResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS appointments (
              TUID INTEGER PRIMARY KEY,
              vehicle_tuid INTEGER NOT NULL REFERENCES vehicles(TUID),
              bay_tuid INTEGER NOT NULL REFERENCES bays(TUID),
              service_tuid INTEGER NOT NULL REFERENCES services(TUID),
              start_time DATETIME NOT NULL,
              end_time DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_appointments_vehicle
              ON appointments(vehicle_tuid);
            "#,
        )?;
        Ok(())
    }

    /// 插入新预约, 返回数据库分配的行ID
    ///
    /// 仅对真正的新预约调用; 启动回放重建日历时不会重复落库
    pub fn insert(&self, appointment: &Appointment) -> StoreResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO appointments (vehicle_tuid, bay_tuid, service_tuid, start_time, end_time)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                appointment.vehicle_tuid,
                appointment.bay_tuid,
                appointment.service_tuid,
                appointment.start_time,
                appointment.end_time,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 读取全部预约, 按行ID升序
    ///
    /// 行ID顺序即当初的预订顺序, 启动回放依赖这一点重现相同的排班结果
    pub fn list_all(&self) -> StoreResult<Vec<Appointment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT TUID, vehicle_tuid, bay_tuid, service_tuid, start_time, end_time
            FROM appointments
            ORDER BY TUID
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Appointment {
                    tuid: Some(row.get(0)?),
                    vehicle_tuid: row.get(1)?,
                    bay_tuid: row.get(2)?,
                    service_tuid: row.get(3)?,
                    start_time: row.get::<_, NaiveDateTime>(4)?,
                    end_time: row.get::<_, NaiveDateTime>(5)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}
