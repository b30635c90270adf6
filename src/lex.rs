use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag_no_case, take_till1, take_while1},
    character::complete::{char, digit1, multispace0, multispace1, one_of, space0},
    combinator::{all_consuming, map, map_res, opt, recognize, rest, value, verify},
    error::{VerboseError, context},
    sequence::{pair, preceded, separated_pair, terminated, tuple},
};

pub type Res<T, U> = IResult<T, U, VerboseError<T>>;

/// A paging keystroke, before it is checked against the page count.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NavToken {
    Next,
    Prev,
    Quit,
    Page(i64),
}

/// Splits a command line into its verb and the untouched remainder.
pub fn command(input: &str) -> Res<&str, (&str, &str)> {
    context(
        "command",
        tuple((
            preceded(multispace0, take_till1(char::is_whitespace)),
            alt((
                preceded(multispace1, rest),
                rest,
            )),
        ))
    )(input)
}

pub fn integer(input: &str) -> Res<&str, i64> {
    context(
        "integer",
        map_res(
            recognize(pair(opt(one_of("+-")), digit1)),
            |s: &str| s.parse::<i64>()
        )
    )(input)
}

fn unsigned(input: &str) -> Res<&str, i64> {
    context(
        "unsigned",
        map_res(digit1, |s: &str| s.parse::<i64>())
    )(input)
}

/// `<digits> <text>`: an unsigned integer, one run of whitespace, and a
/// non-empty remainder.
pub fn int_then_text(input: &str) -> Res<&str, (i64, &str)> {
    context(
        "int_then_text",
        all_consuming(separated_pair(
            unsigned,
            multispace1,
            verify(rest, |s: &str| !s.trim().is_empty())
        ))
    )(input)
}

pub fn nav_token(input: &str) -> Res<&str, NavToken> {
    context(
        "nav_token",
        all_consuming(terminated(
            preceded(
                multispace0,
                alt((
                    value(NavToken::Quit, tag_no_case("quit")),
                    value(NavToken::Quit, tag_no_case("q")),
                    value(NavToken::Next, tag_no_case("n")),
                    value(NavToken::Prev, tag_no_case("p")),
                    map(integer, NavToken::Page),
                ))
            ),
            multispace0
        ))
    )(input)
}

fn config_key(input: &str) -> Res<&str, &str> {
    context(
        "config_key",
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '.' || c == '-')
    )(input)
}

/// One `key = value` (or `key: value`) line of a properties file.
pub fn config_entry(input: &str) -> Res<&str, (&str, &str)> {
    context(
        "config_entry",
        all_consuming(preceded(
            space0,
            separated_pair(
                config_key,
                tuple((space0, one_of("=:"), space0)),
                map(rest, str::trim_end)
            )
        ))
    )(input)
}

pub fn is_config_comment(line: &str) -> bool {
    let res: Res<&str, char> = preceded(space0, alt((char('#'), char('!'))))(line);
    res.is_ok()
}
