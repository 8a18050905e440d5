//! History ledger line format

use msas_api::{ExitClassification, RunOutcome};
use msas_util::{format_clock_time_seconds, format_datetime_full};

/// Status label written for each classification
pub fn classification_label(classification: ExitClassification) -> &'static str {
    match classification {
        ExitClassification::Normal => "正常終了",
        ExitClassification::Abnormal => "異常終了",
    }
}

/// `[YYYY-MM-DD HH:MM:SS] サーバー停止 | 状態: 正常終了 | 停止時刻: HH:MM:SS`
pub fn ledger_line(outcome: &RunOutcome) -> String {
    format!(
        "[{}] サーバー停止 | 状態: {} | 停止時刻: {}",
        format_datetime_full(&outcome.stopped_at),
        classification_label(outcome.classification),
        format_clock_time_seconds(&outcome.stopped_at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn formats_normal_outcome() {
        let stopped_at = Local.with_ymd_and_hms(2025, 12, 25, 3, 4, 5).unwrap();
        let line = ledger_line(&RunOutcome::new(stopped_at, ExitClassification::Normal));
        assert_eq!(
            line,
            "[2025-12-25 03:04:05] サーバー停止 | 状態: 正常終了 | 停止時刻: 03:04:05"
        );
    }

    #[test]
    fn formats_abnormal_outcome() {
        let stopped_at = Local.with_ymd_and_hms(2025, 1, 2, 23, 0, 59).unwrap();
        let line = ledger_line(&RunOutcome::new(stopped_at, ExitClassification::Abnormal));
        assert!(line.contains("状態: 異常終了"));
        assert!(line.ends_with("停止時刻: 23:00:59"));
    }
}
