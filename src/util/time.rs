use chrono::{DateTime, TimeZone};

/// Short relative age such as "just now", "5m ago", "3h ago", "2d ago".
pub fn relative_time<A: TimeZone, B: TimeZone>(then: &DateTime<A>, now: &DateTime<B>) -> String {
    let secs = now.timestamp() - then.timestamp();
    if secs < 60 {
        return "just now".to_string();
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins}m ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days}d ago");
    }
    then.naive_local().format("%Y-%m-%d").to_string()
}
