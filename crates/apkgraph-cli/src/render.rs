use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use apkgraph_index::FetchProgress;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn current_output_style() -> OutputStyle {
    resolve_output_style(std::io::stdout().is_terminal())
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn current() -> Self {
        Self::from_style(current_output_style())
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        let line = render_status_line(self.style, status, message);
        let line = match (self.style, badge_style(status)) {
            (OutputStyle::Rich, Some(style)) => {
                let badge = status_badge(status);
                line.replacen(&badge, &colorize(style, &badge), 1)
            }
            _ => line,
        };
        if status == "ok" {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }

    pub(crate) fn print_section(self, title: &str) {
        if let Some(line) = render_section_header(self.style, title) {
            println!();
            println!("{}", colorize(section_style(), &line));
        }
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    pub(crate) fn download_progress(self, label: &str) -> DownloadProgress {
        DownloadProgress {
            enabled: self.style == OutputStyle::Rich,
            label: label.to_string(),
            progress_bar: None,
        }
    }
}

/// Download progress bar; inert in plain mode.
pub(crate) struct DownloadProgress {
    enabled: bool,
    label: String,
    progress_bar: Option<ProgressBar>,
}

impl FetchProgress for DownloadProgress {
    fn start(&mut self, total: Option<u64>) {
        if !self.enabled {
            return;
        }
        let progress_bar = match total {
            Some(total) => {
                let progress_bar = ProgressBar::new(total.max(1));
                if let Ok(style) = ProgressStyle::with_template(
                    "{spinner:.cyan.bold} {msg:<12} [{bar:20.cyan/blue}] {bytes:>9}/{total_bytes:9} {elapsed_precise}",
                ) {
                    progress_bar.set_style(style.progress_chars("=>-"));
                }
                progress_bar
            }
            None => {
                let progress_bar = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::with_template("{spinner:.cyan.bold} {msg:<12} {bytes:>9}")
                {
                    progress_bar.set_style(style);
                }
                progress_bar
            }
        };
        progress_bar.set_message(self.label.clone());
        progress_bar.enable_steady_tick(Duration::from_millis(80));
        self.progress_bar = Some(progress_bar);
    }

    fn advance(&mut self, downloaded: u64) {
        if let Some(progress_bar) = &self.progress_bar {
            progress_bar.set_position(downloaded);
        }
    }

    fn finish(&mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

fn status_badge(status: &str) -> String {
    format!("[{}]", status.to_ascii_uppercase())
}

fn badge_style(status: &str) -> Option<Style> {
    let color = match status {
        "ok" => AnsiColor::BrightGreen,
        "warn" => AnsiColor::BrightYellow,
        "err" => AnsiColor::BrightRed,
        "info" => AnsiColor::BrightCyan,
        _ => return None,
    };
    Some(Style::new().fg_color(Some(color.into())).effects(Effects::BOLD))
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

pub(crate) fn render_section_header(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(format!("== {title} ==")),
    }
}
