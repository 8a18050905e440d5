//! Renders flow events on the operator's console

use msas_api::FlowEvent;
use msas_core::FlowReporter;
use msas_util::format_clock_time;
use std::io::{self, Write};
use tracing::{debug, warn};

const BANNER: &str = "=============================================";

/// Writes each event as the console text the operator reads
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Flush what is left. A closed console is logged, never fatal.
    pub fn finish(mut self) {
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "Failed to flush console output");
        }
    }

    fn render(&mut self, event: &FlowEvent) -> io::Result<()> {
        let out = &mut self.out;
        match event {
            FlowEvent::ServerStarting { jar_path } => {
                writeln!(out, "\nサーバーを起動します... ({})\n", jar_path.display())?;
            }
            FlowEvent::ServerExited {
                classification,
                detail,
            } => {
                if classification.is_normal() {
                    writeln!(out, "サーバーが正常に終了しました")?;
                } else if let Some(detail) = detail {
                    writeln!(out, "サーバーが異常終了しました: {}", detail)?;
                } else {
                    writeln!(out, "サーバーが異常終了しました")?;
                }
            }
            FlowEvent::HistoryRecorded { location } => {
                writeln!(out, "\nログを記録しました: {}", location)?;
            }
            FlowEvent::HistoryWriteFailed { error } => {
                writeln!(out, "ログの書き込みに失敗しました: {}", error)?;
            }
            FlowEvent::OutsideWindow { now, window } => {
                writeln!(
                    out,
                    "\n現在時刻 {} はシャットダウン時間帯 ({}) 外のため、シャットダウンしません",
                    format_clock_time(now),
                    window
                )?;
            }
            FlowEvent::CountdownStarted { total_seconds } => {
                writeln!(out, "\n{}", BANNER)?;
                writeln!(out, "  MCサーバーが停止しました")?;
                writeln!(out, "  {}秒後にPCをシャットダウンします", total_seconds)?;
                writeln!(out, "  キャンセルするには Enter を押してください")?;
                writeln!(out, "{}\n", BANNER)?;
            }
            FlowEvent::CountdownTick { remaining } => {
                write!(out, "\r残り {:3}秒...", remaining)?;
            }
            FlowEvent::CountdownCancelled { .. } => {
                writeln!(out, "\nシャットダウンをキャンセルしました")?;
            }
            FlowEvent::ShutdownStarting => writeln!(out, "\nシャットダウンします...")?,
            FlowEvent::ShutdownFailed { error } => writeln!(out, "エラー: {}", error)?,
            FlowEvent::AwaitingAcknowledgment => write!(out, "Enterを押すと終了します...")?,
        }
        out.flush()
    }
}

impl<W: Write + Send> FlowReporter for ConsoleReporter<W> {
    fn report(&mut self, event: FlowEvent) {
        if let Err(e) = self.render(&event) {
            debug!(error = %e, ?event, "Console write failed");
        }
    }
}
