/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an opaque, stable identifier for residents, issues and admins.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 将 Unix 毫秒格式化为本地时间 `YYYY-MM-DD HH:MM`
///
/// 无法表示的时间戳原样输出数字。
pub fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| millis.to_string())
}
