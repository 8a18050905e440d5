//! Interactive setup shown before the server starts

use msas_config::{ConfigResult, Settings, parse_countdown_seconds, parse_time};
use std::io::{self, BufRead, ErrorKind, Write};
use tracing::warn;

const BANNER: &str = "=============================================";

/// Console prompts over any reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Show the current settings and let the operator change them.
    ///
    /// Returns the settings to run with. `save` is called only when the
    /// operator chose to edit; a failed save is reported and the edited
    /// settings are still used for this run.
    pub fn setup<S>(&mut self, mut settings: Settings, save: S) -> io::Result<Settings>
    where
        S: FnOnce(&Settings) -> ConfigResult<()>,
    {
        writeln!(self.output, "{}", BANNER)?;
        writeln!(self.output, "  MC Server Auto Shutdown System")?;
        writeln!(self.output, "{}", BANNER)?;
        writeln!(self.output, "\n現在の設定:")?;
        writeln!(self.output, "  サーバーフォルダ  : {}", settings.server_folder)?;
        writeln!(self.output, "  JARファイル名    : {}", settings.server_jar)?;
        writeln!(self.output, "  シャットダウンまで: {}秒", settings.countdown_seconds)?;
        writeln!(
            self.output,
            "  シャットダウン時間帯: {} ～ {}",
            settings.shutdown_time_start, settings.shutdown_time_end
        )?;
        write!(self.output, "\n変更しますか？ (y/Enter): ")?;
        self.output.flush()?;

        let answer = self.read_line()?.unwrap_or_default();
        if answer != "y" {
            write!(
                self.output,
                "\n設定をそのまま使用します。Enterを押すとサーバーを起動します..."
            )?;
            self.output.flush()?;
            self.read_line()?;
            return Ok(settings);
        }

        settings.server_folder = self.ask("サーバーフォルダ名", &settings.server_folder)?;
        settings.server_jar = self.ask("サーバーのJARファイル名", &settings.server_jar)?;

        let current = settings.countdown_seconds.to_string();
        settings.countdown_seconds = self.ask_until(
            "シャットダウンまでの待機時間（秒）",
            &current,
            "  ※ 正しい数値を入力してください",
            parse_countdown_seconds,
        )?;

        settings.shutdown_time_start = self.ask_until(
            "シャットダウン開始時刻 (HH:MM)",
            &settings.shutdown_time_start,
            "  ※ HH:MM 形式で入力してください (例: 02:00)",
            valid_time,
        )?;
        settings.shutdown_time_end = self.ask_until(
            "シャットダウン終了時刻 (HH:MM)",
            &settings.shutdown_time_end,
            "  ※ HH:MM 形式で入力してください (例: 08:00)",
            valid_time,
        )?;

        match save(&settings) {
            Ok(()) => writeln!(self.output, "\n設定を保存しました！")?,
            Err(e) => {
                warn!(error = %e, "Failed to save settings");
                writeln!(self.output, "\n設定の保存に失敗しました: {}", e)?;
            }
        }

        writeln!(self.output, "\n設定完了:")?;
        writeln!(
            self.output,
            "  フォルダ: {} / JAR: {}",
            settings.server_folder, settings.server_jar
        )?;
        writeln!(
            self.output,
            "  停止後 {}秒 でシャットダウン ({} ～ {} の間のみ)",
            settings.countdown_seconds, settings.shutdown_time_start, settings.shutdown_time_end
        )?;
        write!(self.output, "\nEnterを押すとサーバーを起動します...")?;
        self.output.flush()?;
        self.read_line()?;

        Ok(settings)
    }

    /// One trimmed line, or None at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt showing `current`; empty input keeps it
    fn ask_raw(&mut self, prompt: &str, current: &str) -> io::Result<(String, bool)> {
        write!(self.output, "{} ({}): ", prompt, current)?;
        self.output.flush()?;

        Ok(match self.read_line()? {
            Some(line) if !line.is_empty() => (line, false),
            Some(_) => (current.to_string(), false),
            None => (current.to_string(), true),
        })
    }

    fn ask(&mut self, prompt: &str, current: &str) -> io::Result<String> {
        self.ask_raw(prompt, current).map(|(value, _)| value)
    }

    /// Re-prompt until `parse` accepts. Input running out while the current
    /// value is still invalid is an error, not an endless loop.
    fn ask_until<T>(
        &mut self,
        prompt: &str,
        current: &str,
        hint: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> io::Result<T> {
        loop {
            let (value, eof) = self.ask_raw(prompt, current)?;
            if let Some(parsed) = parse(&value) {
                return Ok(parsed);
            }
            writeln!(self.output, "{}", hint)?;
            if eof {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("input closed while '{}' is invalid", value),
                ));
            }
        }
    }
}

fn valid_time(s: &str) -> Option<String> {
    parse_time(s).ok().map(|_| s.to_string())
}
