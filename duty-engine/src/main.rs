use duty_engine::{Actor, DutyManager, setup_environment};

const USAGE: &str = "usage: duty-engine [status|remind]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment()?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "status".to_string());

    // 2. 打开文档存储
    let manager = DutyManager::open(&config)?;

    // 3. 执行命令
    match command.as_str() {
        "status" => {
            let snapshot = manager.dashboard();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        // 每周定时任务调用
        "remind" => {
            let report = manager.send_reminder(&Actor::system(), None).await?;
            tracing::info!(status = %report.status, "Scheduled reminder finished");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        other => {
            anyhow::bail!("unknown command: {other}\n{USAGE}");
        }
    }

    Ok(())
}
