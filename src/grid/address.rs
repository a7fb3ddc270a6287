//! Spreadsheet column letters ↔ 0-based column indices

/// Convert column letters to a 0-based index (A→0, Z→25, AA→26, ...).
///
/// Letters are case-insensitive. Returns `None` for an empty string, a
/// non-alphabetic character, or a value that does not fit in `u32`.
pub fn column_to_index(column: &str) -> Option<u32> {
    if column.is_empty() {
        return None;
    }

    let mut index: u32 = 0;
    for b in column.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let digit = u32::from(b.to_ascii_uppercase() - b'A') + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }

    Some(index - 1)
}

/// Convert a 0-based column index to letters (0→A, 25→Z, 26→AA, ...)
pub fn index_to_column(index: u32) -> String {
    let mut result = String::new();
    let mut num = index;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_index() {
        assert_eq!(column_to_index("A"), Some(0));
        assert_eq!(column_to_index("Z"), Some(25));
        assert_eq!(column_to_index("AA"), Some(26));
        assert_eq!(column_to_index("AB"), Some(27));
        assert_eq!(column_to_index("AZ"), Some(51));
        assert_eq!(column_to_index("BA"), Some(52));
        assert_eq!(column_to_index("AAA"), Some(702));
        assert_eq!(column_to_index("ah"), Some(33));
    }

    #[test]
    fn test_column_to_index_invalid() {
        assert_eq!(column_to_index(""), None);
        assert_eq!(column_to_index("A1"), None);
        assert_eq!(column_to_index("$B"), None);
        assert_eq!(column_to_index("ZZZZZZZZZZ"), None);
    }

    #[test]
    fn test_index_to_column() {
        assert_eq!(index_to_column(0), "A");
        assert_eq!(index_to_column(25), "Z");
        assert_eq!(index_to_column(26), "AA");
        assert_eq!(index_to_column(51), "AZ");
        assert_eq!(index_to_column(52), "BA");
        assert_eq!(index_to_column(702), "AAA");
    }

    #[test]
    fn test_letters_survive_conversion() {
        for column in ["F", "H", "K", "R", "AB", "AD", "AH"] {
            let index = column_to_index(column).unwrap();
            assert_eq!(index_to_column(index), column);
        }
    }
}
