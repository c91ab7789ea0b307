// ==========================================
// 汽修车间预约排产系统 - 命令行主入口
// ==========================================
// 流程: 建会话 (含启动回放) -> 可选导入请求文件 -> 打印排班与
//       周薪 -> 可选删除数据库
// ==========================================

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use repair_shop_aps::app::{get_default_db_path, ShopSession};
use repair_shop_aps::importer::RequestFileParser;
use repair_shop_aps::logging;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", repair_shop_aps::APP_NAME);
    tracing::info!("系统版本: {}", repair_shop_aps::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let today = chrono::Local::now().date_naive();
    let mut session =
        ShopSession::open(&db_path, today).context("无法初始化排产会话")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    // 可选: 导入新的请求文件
    if ask_yes(&mut input, "Would you like to import a new file? (Yes/No)")? {
        let path = ask_existing_file(&mut input)?;
        let ops = RequestFileParser::parse_file(&path)?;
        tracing::info!(%path, ops = ops.len(), "请求文件解析完成");

        for op in &ops {
            if let Err(e) = session.apply(op) {
                // 单条请求失败不必中止整批, 由用户决定是否继续
                println!("{}", e);
                if !ask_yes(&mut input, "Would you like to continue? (Yes/No)")? {
                    return Err(e.into());
                }
            }
        }
    }

    // 打印排班与周薪
    if session.appointments().is_empty() {
        println!("No appointments booked");
    } else {
        let report = session.schedule_report()?;
        print!("{}", report);
    }

    // 可选: 删除数据库
    if ask_yes(&mut input, "Would you like to drop the database? (Yes/No)")? {
        session.drop_database().context("删除数据库失败")?;
        println!("Database dropped");
    }

    Ok(())
}

/// 提问并读取是/否回答
fn ask_yes<R: BufRead>(input: &mut R, question: &str) -> io::Result<bool> {
    println!("{}", question);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}

/// 反复询问直到得到一个存在的文件路径
fn ask_existing_file<R: BufRead>(input: &mut R) -> io::Result<String> {
    loop {
        println!("What is the path to the input file?");
        io::stdout().flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let path = line.trim().to_string();
        if Path::new(&path).exists() {
            return Ok(path);
        }
        println!("That file does not exist!");
    }
}
