// ==========================================
// 汽修车间预约排产系统 - 客户与车辆仓储
// ==========================================
// 职责: 管理 customers / vehicles 表
// 说明: 目录实体会话启动时整表读入, 之后只有插入
// ==========================================

use crate::domain::catalog::{Customer, Vehicle};
use crate::repository::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// CustomerRepository - 客户仓储
// ==========================================
pub struct CustomerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CustomerRepository {
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
            CREATE TABLE IF NOT EXISTS customers (
              TUID INTEGER PRIMARY KEY,
              name TEXT NOT NULL UNIQUE
            );
            "#,
        )?;
        Ok(())
    }

    /// 插入新客户, 返回数据库分配的行ID
    pub fn insert(&self, name: &str) -> StoreResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO customers (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// 读取全部客户
    pub fn list_all(&self) -> StoreResult<Vec<Customer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT TUID, name FROM customers ORDER BY TUID")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Customer {
                    tuid: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}

// ==========================================
// VehicleRepository - 车辆仓储
// ==========================================
pub struct VehicleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VehicleRepository {
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
            CREATE TABLE IF NOT EXISTS vehicles (
              TUID INTEGER PRIMARY KEY,
              customer_tuid INTEGER NOT NULL REFERENCES customers(TUID),
              description TEXT NOT NULL,
              UNIQUE(customer_tuid, description)
            );
            "#,
        )?;
        Ok(())
    }

    /// 插入新车辆, 返回数据库分配的行ID
    pub fn insert(&self, customer_tuid: i64, description: &str) -> StoreResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO vehicles (customer_tuid, description) VALUES (?1, ?2)",
            params![customer_tuid, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 读取全部车辆
    pub fn list_all(&self) -> StoreResult<Vec<Vehicle>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT TUID, customer_tuid, description FROM vehicles ORDER BY TUID")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Vehicle {
                    tuid: row.get(0)?,
                    customer_tuid: row.get(1)?,
                    description: row.get(2)?,
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

    fn setup_repos() -> (CustomerRepository, VehicleRepository) {
        let conn = open_sqlite_connection(":memory:").expect("Failed to open connection");
        let conn = Arc::new(Mutex::new(conn));
        let customers =
            CustomerRepository::from_connection(conn.clone()).expect("Failed to create repo");
        let vehicles =
            VehicleRepository::from_connection(conn).expect("Failed to create repo");
        (customers, vehicles)
    }

    #[test]
    fn test_insert_and_list_customers() {
        let (customers, _) = setup_repos();

        let tuid_a = customers.insert("Alice").expect("Failed to insert");
        let tuid_b = customers.insert("Bob").expect("Failed to insert");
        assert!(tuid_b > tuid_a);

        let all = customers.list_all().expect("Failed to list");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Alice");
        assert_eq!(all[1].name, "Bob");
    }

    #[test]
    fn test_duplicate_customer_name_rejected_by_unique_index() {
        let (customers, _) = setup_repos();

        customers.insert("Alice").expect("Failed to insert");
        let result = customers.insert("Alice");
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_and_list_vehicles() {
        let (customers, vehicles) = setup_repos();

        let owner = customers.insert("Alice").expect("Failed to insert");
        vehicles
            .insert(owner, "Red Truck")
            .expect("Failed to insert");
        vehicles
            .insert(owner, "Blue Sedan")
            .expect("Failed to insert");

        let all = vehicles.list_all().expect("Failed to list");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].customer_tuid, owner);
        assert_eq!(all[0].description, "Red Truck");
    }

    #[test]
    fn test_same_owner_same_description_rejected() {
        let (customers, vehicles) = setup_repos();

        let owner = customers.insert("Alice").expect("Failed to insert");
        vehicles
            .insert(owner, "Red Truck")
            .expect("Failed to insert");
        assert!(vehicles.insert(owner, "Red Truck").is_err());
    }
}
