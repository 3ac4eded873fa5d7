use camsweep_common::network::subnet::SubnetPrefix;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
    "▁▁▁▁▁",
];

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:32.green/bright_black}] {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICK_STRINGS)
        .progress_chars("█▓░")
}

/// Span carrying the sweep's progress bar. The bar is drawn while the span
/// is entered and cleared when it closes.
pub fn scan_span(subnet: SubnetPrefix, port: u16) -> Span {
    let span = info_span!("sweep", indicatif.pb_show = true);
    span.pb_set_style(&style());
    span.pb_set_length(100);
    span.pb_set_message(&format!("sweeping {subnet}.0/24 on port {port}"));
    span
}

pub fn report(span: &Span, percent_complete: u8) {
    span.pb_set_position(u64::from(percent_complete));
}
