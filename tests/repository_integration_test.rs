// ==========================================
// 仓储与建库预置集成测试
// ==========================================
// 场景: 首次打开会话建表并预置主数据, 校验预置内容与量化参数
// ==========================================


use repair_shop_aps::db::open_sqlite_connection;
use repair_shop_aps::repository::{
    BayRepository, CustomerRepository, MechanicRepository, ServiceRepository,
};
use std::sync::{Arc, Mutex};
use test_helpers::create_test_session;

#[test]
fn test_first_open_seeds_master_data() {
    let (db_file, session) = create_test_session();
    drop(session);

    let conn = open_sqlite_connection(db_file.path().to_str().expect("Invalid temp path"))
        .expect("Failed to open connection");
    let conn = Arc::new(Mutex::new(conn));

    let mechanics = MechanicRepository::from_connection(conn.clone())
        .expect("Failed to create repo")
        .list_all()
        .expect("Failed to list");
    assert_eq!(mechanics.len(), 2);
    assert_eq!(mechanics[0].name, "Sue");
    assert_eq!(mechanics[0].hourly_rate, 10.00);
    assert_eq!(mechanics[1].name, "Steve");
    assert_eq!(mechanics[1].hourly_rate, 9.00);

    let services = ServiceRepository::from_connection(conn.clone())
        .expect("Failed to create repo")
        .list_all()
        .expect("Failed to list");
    let durations: Vec<u32> = services.iter().map(|s| s.duration_min).collect();
    assert_eq!(durations, vec![30, 60, 180, 120, 240]);

    let bays = BayRepository::from_connection(conn.clone())
        .expect("Failed to create repo")
        .list_all()
        .expect("Failed to list");
    assert_eq!(bays.len(), 2);
    // 1 号工位归 Sue, 2 号工位归 Steve
    assert_eq!(bays[0].mechanic_tuid, mechanics[0].tuid);
    assert_eq!(bays[1].mechanic_tuid, mechanics[1].tuid);

    // 建库后尚无客户
    let customers = CustomerRepository::from_connection(conn)
        .expect("Failed to create repo")
        .list_all()
        .expect("Failed to list");
    assert!(customers.is_empty());
}

#[test]
fn test_second_open_does_not_reseed() {
    let (db_file, session) = create_test_session();
    drop(session);

    // 第二次打开同一数据库, 主数据不应翻倍
    let db_path = db_file
        .path()
        .to_str()
        .expect("Invalid temp path")
        .to_string();
    let session = repair_shop_aps::app::ShopSession::open(&db_path, test_helpers::fixed_today())
        .expect("Failed to reopen session");
    drop(session);

    let conn = open_sqlite_connection(&db_path).expect("Failed to open connection");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM mechanics", [], |row| row.get(0))
        .expect("Failed to count");
    assert_eq!(count, 2);
}

#[test]
fn test_report_sections_follow_bay_order() {
    let (_db, session) = create_test_session();

    let report = session.schedule_report().expect("Failed to build report");
    assert_eq!(report.sections.len(), 2);
    assert_eq!(report.sections[0].bay_tuid, 1);
    assert_eq!(report.sections[1].bay_tuid, 2);
}

#[test]
fn test_drop_database_removes_file() {
    let (db_file, session) = create_test_session();
    // 数据库文件由会话接管删除, 临时文件句柄转为仅保路径
    let db_path = db_file.into_temp_path().keep().expect("Failed to keep temp file");

    let db_path_str = db_path.to_str().expect("Invalid temp path").to_string();
    drop(session);
    let session = repair_shop_aps::app::ShopSession::open(&db_path_str, test_helpers::fixed_today())
        .expect("Failed to reopen session");

    session.drop_database().expect("Failed to drop database");
    assert!(!db_path.exists());
}
