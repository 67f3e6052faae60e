use chrono::Local;

/// Builds `"<base>[_<tag>]_<YYYYMMDD_HHMMSS><extension>"` from the current
/// local time. Shapes the export entry point only; carries no parsing logic.
pub fn timestamped_file_name(base: &str, tag: Option<&str>, extension: &str) -> String {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    match tag {
        Some(tag) if !tag.is_empty() => format!("{}_{}_{}{}", base, tag, stamp, extension),
        _ => format!("{}_{}{}", base, stamp, extension),
    }
}
