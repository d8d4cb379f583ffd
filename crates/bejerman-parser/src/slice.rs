//! Fixed slice extraction

use crate::layout::FieldSlice;

/// Return the characters of `line` inside `slice`.
///
/// Short lines behave as if right-padded with spaces up to `slice.end`, so
/// this never fails. Positions count `char`s, not bytes.
pub fn slice_text(line: &str, slice: FieldSlice) -> String {
    line.chars()
        .chain(std::iter::repeat(' '))
        .skip(slice.start)
        .take(slice.width())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_inside_line() {
        assert_eq!(slice_text("ACME SA   0001", FieldSlice::new(0, 7)), "ACME SA");
        assert_eq!(slice_text("ACME SA   0001", FieldSlice::new(10, 14)), "0001");
    }

    #[test]
    fn test_short_line_is_padded() {
        let line = "ABC";
        let padded = format!("{:<20}", line);
        let slice = FieldSlice::new(1, 20);
        assert_eq!(slice_text(line, slice), &padded[1..20]);
        assert_eq!(slice_text("", FieldSlice::new(5, 8)), "   ");
    }

    #[test]
    fn test_slice_counts_chars_not_bytes() {
        // "ñ" and "é" are two bytes each in UTF-8
        let line = "Compañía Señor";
        assert_eq!(slice_text(line, FieldSlice::new(0, 8)), "Compañía");
        assert_eq!(slice_text(line, FieldSlice::new(9, 14)), "Señor");
    }
}
