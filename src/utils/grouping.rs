//! Fixed-width grouping of cipher output.
//!
//! Traditional cipher traffic is written in blocks of five symbols. These
//! helpers drop the message's own spacing and regroup it.

/// Conventional group width for cipher text.
pub const DEFAULT_GROUP_WIDTH: usize = 5;

/// Splits `msg` into groups of `width` symbols separated by single spaces.
///
/// All whitespace in `msg` is discarded first. The last group may be
/// shorter. A `width` of 0 is treated as no grouping.
///
/// # Parameters
/// - `msg`: The text to regroup.
/// - `width`: Number of symbols per group.
///
/// # Returns
/// The regrouped text, empty if `msg` holds no symbols.
///
/// # Examples
///
/// ```
/// use enigma::utils::grouping::group_symbols;
///
/// assert_eq!(group_symbols("QVPQ SOK OILPUBKJ ZPISFXDW", 5), "QVPQS OKOIL PUBKJ ZPISF XDW");
/// ```
pub fn group_symbols(msg: &str, width: usize) -> String {
    let symbols: Vec<char> = msg.chars().filter(|c| !c.is_whitespace()).collect();
    if width == 0 {
        return symbols.into_iter().collect();
    }
    symbols
        .chunks(width)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple() {
        assert_eq!(group_symbols("ABCDEFGHIJ", 5), "ABCDE FGHIJ");
    }

    #[test]
    fn test_short_last_group() {
        assert_eq!(group_symbols("ABCDEFG", 5), "ABCDE FG");
        assert_eq!(group_symbols("ABC", 5), "ABC");
    }

    #[test]
    fn test_existing_spacing_discarded() {
        assert_eq!(group_symbols("AB CD\tEF  G", 3), "ABC DEF G");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(group_symbols("", 5), "");
        assert_eq!(group_symbols("    ", 5), "");
    }

    #[test]
    fn test_zero_width_joins_everything() {
        assert_eq!(group_symbols("AB CD", 0), "ABCD");
    }
}
