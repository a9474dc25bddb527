use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, multispace0},
    combinator::map,
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace.
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// Single- or double-quoted text without escapes.
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )(input)
}
