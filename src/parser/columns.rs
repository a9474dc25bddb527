use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::{map, map_res},
    error::{Error, ErrorKind},
    multi::separated_list1,
    IResult,
};

use crate::draw::ColumnIndex;
use crate::parser::lexer::{string_literal, ws};

fn column_number(input: &str) -> IResult<&str, ColumnIndex> {
    map_res(digit1, |s: &str| s.parse::<usize>().map(ColumnIndex::Number))(input)
}

fn column_name(input: &str) -> IResult<&str, ColumnIndex> {
    map(string_literal, ColumnIndex::Name)(input)
}

/// Text between balanced parentheses, without the outer pair.
fn parenthesized(input: &str) -> IResult<&str, &str> {
    let (rest, _) = char('(')(input)?;
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&rest[i + 1..], &rest[..i]));
                }
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn column_expr(input: &str) -> IResult<&str, ColumnIndex> {
    map(parenthesized, |s: &str| ColumnIndex::Expr(s.trim().to_string()))(input)
}

/// Parse a `using` clause body such as `1:($2*10):'speed'`.
pub fn parse_columns(input: &str) -> IResult<&str, Vec<ColumnIndex>> {
    separated_list1(
        ws(char(':')),
        ws(alt((column_number, column_name, column_expr))),
    )(input)
}
