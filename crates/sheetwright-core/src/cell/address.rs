//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2")
///
/// Columns are stored as a 0-based index (A=0, B=1, ..., XFD=16383) while rows
/// keep the 1-based number used by the sheet's row sequence, so `A10` lives in
/// row 10. The optional `$` markers are remembered but play no part in equality
/// of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row number (1-based)
    pub row: u32,
    /// Column index (0-based)
    pub col: u16,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a new cell address with relative references
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use sheetwright_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A10").unwrap();
    /// assert_eq!(addr.row, 10);
    /// assert_eq!(addr.col, 0);
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!(addr.column_label(), "B");
    /// assert!(addr.row_absolute && addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        let col_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        let col = Self::letters_to_column(&s[col_start..pos])?;

        let row_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }
        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }
        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self {
            row,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }
        // Anything longer than XFD overflows before we can range check it.
        if letters.len() > 3 {
            return Err(Error::InvalidAddress(format!(
                "column '{}' is out of range",
                letters
            )));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }

        let col = col - 1;
        if col >= MAX_COLS as u32 {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }

        Ok(col as u16)
    }

    /// Column letters of this address
    pub fn column_label(&self) -> String {
        Self::column_to_letters(self.col)
    }

    /// Format as A1-style string, keeping any `$` markers
    pub fn to_a1_string(&self) -> String {
        let mut result = String::new();
        if self.col_absolute {
            result.push('$');
        }
        result.push_str(&self.column_label());
        if self.row_absolute {
            result.push('$');
        }
        result.push_str(&self.row.to_string());
        result
    }

    /// Format as a fully absolute reference (`$A$1`)
    pub fn to_absolute_string(&self) -> String {
        format!("${}${}", self.column_label(), self.row)
    }

    /// Same position with both `$` markers dropped
    pub fn relative(&self) -> Self {
        Self::new(self.row, self.col)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range, normalized so `start` is the top-left corner
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        let (start_row, end_row) = if start.row <= end.row {
            (start.row, end.row)
        } else {
            (end.row, start.row)
        };
        let (start_col, end_col) = if start.col <= end.col {
            (start.col, end.col)
        } else {
            (end.col, start.col)
        };

        Self {
            start: CellAddress::new(start_row, start_col),
            end: CellAddress::new(end_row, end_col),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        let addr = addr.relative();
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from `A1:B10` or `A1` notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidRange("empty range".into()));
        }

        match s.split_once(':') {
            Some((from, to)) => {
                let start = CellAddress::parse(from)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                let end = CellAddress::parse(to)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                Ok(Self::new(start, end))
            }
            None => {
                let addr = CellAddress::parse(s)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                Ok(Self::single(addr))
            }
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && self.end.row >= other.start.row
            && self.start.col <= other.end.col
            && self.end.col >= other.start.col
    }

    /// Format as `A1:B10` (or `A1` for a single cell)
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }

    /// Format as `$A$1:$B$10` (or `$A$1` for a single cell)
    pub fn to_absolute_string(&self) -> String {
        if self.start == self.end {
            self.start.to_absolute_string()
        } else {
            format!(
                "{}:{}",
                self.start.to_absolute_string(),
                self.end.to_absolute_string()
            )
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Quote a sheet name for use in a reference (`Q1 'Sales'` → `'Q1 ''Sales'''`)
pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Split a sheet-qualified reference into the sheet name and the range text.
///
/// Accepts quoted (`'My Sheet'!$A$1:$C$5`) and bare (`Sheet1!A1`) forms.
/// Returns `None` when there is no sheet qualifier.
pub fn split_sheet_reference(content: &str) -> Option<(String, &str)> {
    let content = content.trim();

    if let Some(rest) = content.strip_prefix('\'') {
        let mut name = String::new();
        let mut chars = rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != '\'' {
                name.push(c);
                continue;
            }
            if matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                name.push('\'');
                continue;
            }
            // Closing quote must be followed by '!'
            return rest[i + 1..].strip_prefix('!').map(|range| (name, range));
        }
        return None;
    }

    let (name, range) = content.rsplit_once('!')?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), range))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("z").unwrap(), 25);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);
        assert!(CellAddress::letters_to_column("XFE").is_err());
        assert!(CellAddress::letters_to_column("AAAA").is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("A10").unwrap();
        assert_eq!((addr.row, addr.col), (10, 0));
        assert!(!addr.row_absolute);

        let addr = CellAddress::parse("$C$5").unwrap();
        assert_eq!((addr.row, addr.col), (5, 2));
        assert!(addr.col_absolute && addr.row_absolute);

        let addr = CellAddress::parse("B$7").unwrap();
        assert!(!addr.col_absolute);
        assert!(addr.row_absolute);
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("10").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A+1").is_err());
        assert!(CellAddress::parse("not-a-ref").is_err());
        assert!(matches!(
            CellAddress::parse("A1048577"),
            Err(Error::RowOutOfBounds(1_048_577, _))
        ));
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::parse("$b$2").unwrap().to_string(), "$B$2");
        assert_eq!(CellAddress::new(3, 27).to_a1_string(), "AB3");
        assert_eq!(CellAddress::new(3, 27).to_absolute_string(), "$AB$3");
    }

    #[test]
    fn test_cell_range_parse() {
        let range = CellRange::parse("C5:A1").unwrap();
        assert_eq!(range.start, CellAddress::new(1, 0));
        assert_eq!(range.end, CellAddress::new(5, 2));
        assert_eq!(range.to_a1_string(), "A1:C5");
        assert_eq!(range.to_absolute_string(), "$A$1:$C$5");

        let single = CellRange::parse("$B$2").unwrap();
        assert_eq!(single.to_a1_string(), "B2");
        assert_eq!(single.to_absolute_string(), "$B$2");

        assert!(CellRange::parse("A1:").is_err());
        assert!(CellRange::parse("").is_err());
    }

    #[test]
    fn test_cell_range_contains_and_overlaps() {
        let range = CellRange::parse("B2:D4").unwrap();
        assert!(range.contains(&CellAddress::new(2, 1)));
        assert!(!range.contains(&CellAddress::new(1, 1)));
        assert!(range.overlaps(&CellRange::parse("D4:E9").unwrap()));
        assert!(!range.overlaps(&CellRange::parse("E5").unwrap()));
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Sheet1"), "'Sheet1'");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
    }

    #[test]
    fn test_split_sheet_reference() {
        assert_eq!(
            split_sheet_reference("'Sheet1'!$A$1:$C$5"),
            Some(("Sheet1".to_string(), "$A$1:$C$5"))
        );
        assert_eq!(
            split_sheet_reference("'Bob''s'!A1"),
            Some(("Bob's".to_string(), "A1"))
        );
        assert_eq!(
            split_sheet_reference("Data!B2"),
            Some(("Data".to_string(), "B2"))
        );
        assert_eq!(split_sheet_reference("A1:B2"), None);
        assert_eq!(split_sheet_reference("'unterminated!A1"), None);
    }
}
