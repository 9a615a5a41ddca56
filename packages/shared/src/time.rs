use chrono::{DateTime, Local, TimeZone};

/// Display format of every timestamp shown to chat users (`14:05 16/10/2026`).
pub const MESSAGE_TIME_FORMAT: &str = "%H:%M %d/%m/%Y";

/// Current local time, formatted for display in chat messages.
pub fn message_time() -> String {
    format_message_time(&Local::now())
}

/// Format a timestamp with [`MESSAGE_TIME_FORMAT`].
pub fn format_message_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format(MESSAGE_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn test_format_message_time() {
        // テスト項目: 時刻が "HH:MM dd/mm/YYYY" 形式でフォーマットされる
        // given (前提条件):
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let naive = NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        let time = jst.from_local_datetime(&naive).unwrap();

        // when (操作):
        let formatted = format_message_time(&time);

        // then (期待する結果):
        assert_eq!(formatted, "09:05 07/03/2026");
    }

    #[test]
    fn test_message_time_shape() {
        // テスト項目: 現在時刻の文字列が固定長の形式になっている
        // when (操作):
        let now = message_time();

        // then (期待する結果):
        assert_eq!(now.len(), "00:00 01/01/2000".len());
        assert_eq!(&now[2..3], ":");
        assert_eq!(&now[5..6], " ");
    }
}
