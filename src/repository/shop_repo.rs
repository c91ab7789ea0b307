// ==========================================
// 汽修车间预约排产系统 - 车间主数据仓储
// ==========================================
// 职责: 管理 mechanics / bays / services 表
// 说明: 三张表均为会话只读主数据, 首次建库时预置
// ==========================================

use crate::domain::catalog::{Bay, Mechanic, ServiceItem};
use crate::repository::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// MechanicRepository - 技师仓储
// ==========================================
pub struct MechanicRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MechanicRepository {
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
            CREATE TABLE IF NOT EXISTS mechanics (
              TUID INTEGER PRIMARY KEY,
              name TEXT NOT NULL,
              hourly_rate REAL NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// 插入技师, 返回数据库分配的行ID
    pub fn insert(&self, name: &str, hourly_rate: f64) -> StoreResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO mechanics (name, hourly_rate) VALUES (?1, ?2)",
            params![name, hourly_rate],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 读取全部技师
    pub fn list_all(&self) -> StoreResult<Vec<Mechanic>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT TUID, name, hourly_rate FROM mechanics ORDER BY TUID")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Mechanic {
                    tuid: row.get(0)?,
                    name: row.get(1)?,
                    hourly_rate: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// 表内是否还没有任何技师 (用于首次建库判断)
    pub fn is_empty(&self) -> StoreResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM mechanics", [], |row| row.get(0))?;
        Ok(count == 0)
    }
}

// ==========================================
// BayRepository - 工位仓储
// ==========================================
pub struct BayRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BayRepository {
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
            CREATE TABLE IF NOT EXISTS bays (
              TUID INTEGER PRIMARY KEY,
              mechanic_tuid INTEGER NOT NULL REFERENCES mechanics(TUID)
            );
            "#,
        )?;
        Ok(())
    }

    /// 插入工位, 返回数据库分配的工位号
    pub fn insert(&self, mechanic_tuid: i64) -> StoreResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO bays (mechanic_tuid) VALUES (?1)",
            params![mechanic_tuid],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 读取全部工位 (按工位号升序, 即优先级顺序)
    pub fn list_all(&self) -> StoreResult<Vec<Bay>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT TUID, mechanic_tuid FROM bays ORDER BY TUID")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Bay {
                    tuid: row.get(0)?,
                    mechanic_tuid: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}

// ==========================================
// ServiceRepository - 服务项目仓储
// ==========================================
pub struct ServiceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ServiceRepository {
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
            CREATE TABLE IF NOT EXISTS services (
              TUID INTEGER PRIMARY KEY,
              name TEXT NOT NULL UNIQUE,
              duration_min INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// 插入服务项目, 返回数据库分配的行ID
    pub fn insert(&self, name: &str, duration_min: u32) -> StoreResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO services (name, duration_min) VALUES (?1, ?2)",
            params![name, duration_min],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 读取全部服务项目
    pub fn list_all(&self) -> StoreResult<Vec<ServiceItem>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT TUID, name, duration_min FROM services ORDER BY TUID")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ServiceItem {
                    tuid: row.get(0)?,
                    name: row.get(1)?,
                    duration_min: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_sqlite_connection;

    fn shared_conn() -> Arc<Mutex<Connection>> {
        let conn = open_sqlite_connection(":memory:").expect("Failed to open connection");
        Arc::new(Mutex::new(conn))
    }

    #[test]
    fn test_mechanic_roundtrip_and_emptiness() {
        let repo = MechanicRepository::from_connection(shared_conn())
            .expect("Failed to create repo");

        assert!(repo.is_empty().expect("Failed to count"));

        repo.insert("Sue", 10.0).expect("Failed to insert");
        repo.insert("Steve", 9.0).expect("Failed to insert");

        assert!(!repo.is_empty().expect("Failed to count"));

        let all = repo.list_all().expect("Failed to list");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Sue");
        assert_eq!(all[0].hourly_rate, 10.0);
        assert_eq!(all[1].name, "Steve");
    }

    #[test]
    fn test_bays_listed_in_priority_order() {
        let conn = shared_conn();
        let mechanics = MechanicRepository::from_connection(conn.clone())
            .expect("Failed to create repo");
        let bays = BayRepository::from_connection(conn).expect("Failed to create repo");

        let sue = mechanics.insert("Sue", 10.0).expect("Failed to insert");
        let steve = mechanics.insert("Steve", 9.0).expect("Failed to insert");
        bays.insert(sue).expect("Failed to insert");
        bays.insert(steve).expect("Failed to insert");

        let all = bays.list_all().expect("Failed to list");
        assert_eq!(all.len(), 2);
        assert!(all[0].tuid < all[1].tuid);
        assert_eq!(all[0].mechanic_tuid, sue);
    }

    #[test]
    fn test_service_roundtrip() {
        let repo = ServiceRepository::from_connection(shared_conn())
            .expect("Failed to create repo");

        repo.insert("Oil Change", 30).expect("Failed to insert");
        repo.insert("Brakes", 180).expect("Failed to insert");

        let all = repo.list_all().expect("Failed to list");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].duration_min, 30);
        assert_eq!(all[1].name, "Brakes");
    }
}
