use std::path::Path;
use urlencoding;

/// Generates a URL for a local file that is compatible with the custom
/// protocol handler the webview uses for local assets. This abstracts away
/// the specific scheme and encoding requirements of the current
/// Dioxus/WebView configuration.
pub fn get_local_file_url(path: &Path) -> String {
    // 1. Convert path separators to forward slashes (standard API for URL paths)
    let p_str = path.to_string_lossy().replace("\\", "/");

    // 2. Percent-encode the path to handle spaces, distinct characters, etc.
    // 3. Prefix with the configured custom protocol host mapping.
    format!("http://segitelep.localhost/{}", urlencoding::encode(&p_str))
}

pub fn parse_f64_input(value: &str, fallback: f64) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return fallback;
    }
    trimmed.parse::<f64>().unwrap_or(fallback)
}

/// Format seconds as m:ss.t for time readouts.
pub fn format_timecode(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = seconds - minutes as f64 * 60.0;
    format!("{}:{:04.1}", minutes, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64_falls_back() {
        assert_eq!(parse_f64_input("", 2.5), 2.5);
        assert_eq!(parse_f64_input("abc", 2.5), 2.5);
        assert_eq!(parse_f64_input(" 3.5 ", 2.5), 3.5);
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0.0), "0:00.0");
        assert_eq!(format_timecode(65.25), "1:05.2");
    }
}
