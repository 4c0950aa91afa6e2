/// Extracts the bare hall name from a `Name-Capacity` label.
///
/// The label is split on its last `-`. A purely numeric suffix is dropped;
/// anything else keeps the whole label as the name.
///
/// # Example
///
/// ```
/// use examforge_scoring::extract_hall_name;
///
/// assert_eq!(extract_hall_name("LR1-550"), "LR1");
/// assert_eq!(extract_hall_name("Mechanical-New Workshop-550"), "Mechanical-New Workshop");
/// assert_eq!(extract_hall_name("Room42"), "Room42");
/// assert_eq!(extract_hall_name("Block-A"), "Block-A");
/// ```
pub fn extract_hall_name(label: &str) -> &str {
    match label.rsplit_once('-') {
        Some((name, suffix)) if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_numeric_capacity() {
        assert_eq!(extract_hall_name("LR1-550"), "LR1");
        assert_eq!(extract_hall_name("AUD-200"), "AUD");
        assert_eq!(extract_hall_name("ELTU2-75"), "ELTU2");
    }

    #[test]
    fn test_keeps_label_without_numeric_suffix() {
        assert_eq!(extract_hall_name("Room42"), "Room42");
        assert_eq!(extract_hall_name("LR1-"), "LR1-");
        assert_eq!(extract_hall_name("LR1-5a"), "LR1-5a");
        assert_eq!(extract_hall_name(""), "");
    }
}
