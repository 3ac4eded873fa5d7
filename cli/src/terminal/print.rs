use std::fmt::Display;
use std::time::Duration;

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;
use crate::terminal::logging::PRINT_TARGET;

pub const TOTAL_WIDTH: usize = 64;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn banner() {
    let text_content: String = format!("⟦ CAMSWEEP v{} ⟧", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2).bright_black();

    print(&format!("{sep}{text}{sep}"));
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&line.to_string());
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    print(&format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT)));
}

pub fn aligned_line(key: &str, value: impl Display, width: usize) {
    let dots: String = ".".repeat((width + 1).saturating_sub(key.len()));
    print_status(format!(
        "{}{}{} {}",
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value
    ));
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    print(&format!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn as_tree_one_level(key_value_pairs: &[(String, ColoredString)]) {
    let width = key_value_pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 2;

    for (i, (key, value)) in key_value_pairs.iter().enumerate() {
        let last: bool = i + 1 == key_value_pairs.len();
        let branch: ColoredString = if last { "└─".bright_black() } else { "├─".bright_black() };
        print(&format!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            ".".repeat(width - key.len()).color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}{space}"));
}

pub fn no_results() {
    centerln(&"no cameras answered on this port".red().bold().to_string());
}

pub fn summary(found: usize, matched: usize, elapsed: Duration) {
    fat_separator();
    centerln(&format!(
        "{} device(s), {} with credentials, in {:.2}s",
        found.to_string().color(colors::ACCENT).bold(),
        matched.to_string().color(colors::ACCENT).bold(),
        elapsed.as_secs_f64()
    ));
    fat_separator();
}
