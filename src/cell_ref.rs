//! A1-style cell references as they appear in worksheet `c/@r` attributes.

/// Parse a reference like `B3` or `$AA$10` into 0-based (column, row).
///
/// Ranges and anything that is not letters followed by digits are rejected.
pub fn parse_cell_ref(reference: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in reference {
        match b {
            b'$' => {}
            b if b.is_ascii_alphabetic() && !saw_row => {
                col = col
                    .checked_mul(26)?
                    .checked_add(u32::from(b.to_ascii_uppercase() - b'A') + 1)?;
                saw_col = true;
            }
            b if b.is_ascii_digit() => {
                row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
                saw_row = true;
            }
            _ => return None,
        }
    }

    if !saw_col || row == 0 {
        return None;
    }
    Some((col - 1, row - 1))
}
