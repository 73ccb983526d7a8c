const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Binary-prefixed size with a truncated integer magnitude, e.g. `"  1 KiB"` for 1536.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes;
    for unit in UNITS {
        if size < 1024 {
            return format!("{size:>3} {unit}");
        }
        size /= 1024;
    }
    "?iB".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "  0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "  1 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "  5 MiB");
        assert_eq!(format_size(1024u64.pow(4)), "  1 TiB");
        assert_eq!(format_size(1024u64.pow(5)), "?iB");
    }
}
