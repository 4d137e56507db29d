use super::*;
use nom::{
    character::complete::{alpha1, char, digit1, space0},
    combinator::{all_consuming, map_res, rest},
    sequence::{pair, preceded},
    IResult,
};

/// One line typed into the terminal front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text: type it into the country input and press Enter.
    Search(String),
    /// Select a dropdown option, `None` being the empty one.
    Continent(Option<Continent>),
    /// Click a list entry, zero-based.
    Pick(usize),
    Reset,
    Map,
    Stats,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command \":{0}\", try :help")]
    Unknown(String),
    #[error("unknown continent \"{0}\"")]
    UnknownContinent(String),
    #[error("expected a list entry number starting at 1, got \"{0}\"")]
    BadEntry(String),
}

pub const HELP: &str = "\
<country name>        search a country by name
:continent <name>     list the countries of a continent (Africa, Americas, Antarctic, Asia, Europe, Oceania)
:pick <n>             show entry n of the list
:reset                start over
:map                  show the visible map tiles
:stats                show lookup timings
:quit                 leave";

/// `:keyword argument`
fn directive(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(char(':'), pair(alpha1, preceded(space0, rest)))(input)
}

fn entry_number(input: &str) -> IResult<&str, usize> {
    all_consuming(map_res(digit1, |digits: &str| digits.parse::<usize>()))(input)
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if !line.starts_with(':') {
        return Ok(Command::Search(line.to_string()));
    }

    let (keyword, argument) = match directive(line) {
        Ok((_, parsed)) => parsed,
        Err(_) => return Err(CommandError::Unknown(line[1..].to_string())),
    };
    let argument = argument.trim();

    match keyword.to_lowercase().as_str() {
        "continent" | "region" if argument.is_empty() => Ok(Command::Continent(None)),
        "continent" | "region" => argument
            .parse::<Continent>()
            .map(|c| Command::Continent(Some(c)))
            .map_err(CommandError::UnknownContinent),
        "pick" => match entry_number(argument) {
            Ok((_, n)) if n > 0 => Ok(Command::Pick(n - 1)),
            _ => Err(CommandError::BadEntry(argument.to_string())),
        },
        "reset" => Ok(Command::Reset),
        "map" => Ok(Command::Map),
        "stats" => Ok(Command::Stats),
        "help" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(keyword.to_string())),
    }
}

#[test]
fn plain_text_is_a_search() {
    assert_eq!(
        parse_command("  United Kingdom \n"),
        Ok(Command::Search("United Kingdom".into()))
    );
    assert_eq!(parse_command(""), Ok(Command::Search(String::new())));
}

#[test]
fn parses_directives() {
    assert_eq!(
        parse_command(":continent europe"),
        Ok(Command::Continent(Some(Continent::Europe)))
    );
    assert_eq!(
        parse_command(":Region   Oceania"),
        Ok(Command::Continent(Some(Continent::Oceania)))
    );
    assert_eq!(parse_command(":continent"), Ok(Command::Continent(None)));
    assert_eq!(parse_command(":pick 3"), Ok(Command::Pick(2)));
    assert_eq!(parse_command(":reset"), Ok(Command::Reset));
    assert_eq!(parse_command(":q"), Ok(Command::Quit));
}

#[test]
fn rejects_bad_directives() {
    assert_eq!(
        parse_command(":continent atlantis"),
        Err(CommandError::UnknownContinent("atlantis".into()))
    );
    assert_eq!(parse_command(":pick 0"), Err(CommandError::BadEntry("0".into())));
    assert_eq!(parse_command(":pick two"), Err(CommandError::BadEntry("two".into())));
    assert_eq!(parse_command(":fly"), Err(CommandError::Unknown("fly".into())));
    assert_eq!(parse_command(":42"), Err(CommandError::Unknown("42".into())));
}
