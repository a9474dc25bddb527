// Parsers for the small text forms accepted on the command line

pub mod columns;
pub mod lexer;
pub mod range;

use anyhow::{anyhow, Result};
use nom::combinator::all_consuming;

use crate::draw::ColumnIndex;
use crate::plot::Range;

pub use columns::parse_columns;
pub use range::parse_range;

/// Parse `[min:max]` into a validated range.
pub fn range(input: &str) -> Result<Range> {
    let (_, parsed) = all_consuming(parse_range)(input)
        .map_err(|e| anyhow!("Invalid range '{}': {:?}", input, e))?;
    Range::new(parsed.min, parsed.max)
}

/// Parse a column list such as `1:2:'name'`.
pub fn columns(input: &str) -> Result<Vec<ColumnIndex>> {
    let (_, parsed) = all_consuming(parse_columns)(input)
        .map_err(|e| anyhow!("Invalid column list '{}': {:?}", input, e))?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::Bound;

    #[test]
    fn test_range_wrapper() {
        let range = range("[1:*]").unwrap();
        assert_eq!(range.min, Bound::Value(1.0));
        assert_eq!(range.max, Bound::Auto);
    }

    #[test]
    fn test_range_rejects_trailing_input() {
        let err = range("[1:2] extra").unwrap_err();
        assert!(err.to_string().starts_with("Invalid range '[1:2] extra'"));
    }

    #[test]
    fn test_range_rejects_non_finite() {
        assert!(range("[nan:1]").is_err());
    }

    #[test]
    fn test_columns_wrapper() {
        assert_eq!(columns("2:'y'").unwrap().len(), 2);
        assert!(columns("2:").is_err());
    }
}
