use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::map,
    IResult,
};

use crate::parser::lexer::{number_literal, ws};
use crate::plot::{Bound, Range};

/// `*` autoscales, a number fixes the bound, nothing keeps it.
pub fn parse_bound(input: &str) -> IResult<&str, Bound> {
    alt((
        map(ws(char('*')), |_| Bound::Auto),
        map(ws(number_literal), Bound::Value),
        map(multispace0, |_| Bound::Keep),
    ))(input)
}

/// Parse `[min:max]`.
pub fn parse_range(input: &str) -> IResult<&str, Range> {
    let (input, _) = ws(char('['))(input)?;
    let (input, min) = parse_bound(input)?;
    let (input, _) = ws(char(':'))(input)?;
    let (input, max) = parse_bound(input)?;
    let (input, _) = ws(char(']'))(input)?;
    Ok((input, Range { min, max }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        let (rest, range) = parse_range("[0:10]").unwrap();
        assert_eq!(rest, "");
        assert_eq!(range.min, Bound::Value(0.0));
        assert_eq!(range.max, Bound::Value(10.0));
    }

    #[test]
    fn test_parse_range_with_whitespace() {
        let (_, range) = parse_range("  [ -2.5 : * ] ").unwrap();
        assert_eq!(range.min, Bound::Value(-2.5));
        assert_eq!(range.max, Bound::Auto);
    }

    #[test]
    fn test_parse_range_keeps_empty_bounds() {
        let (_, range) = parse_range("[:5]").unwrap();
        assert_eq!(range.min, Bound::Keep);
        assert_eq!(range.to_string(), "[:5]");
    }

    #[test]
    fn test_parse_range_missing_bracket() {
        assert!(parse_range("0:10]").is_err());
        assert!(parse_range("[0:10").is_err());
        assert!(parse_range("[0 10]").is_err());
    }
}
