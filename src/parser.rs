use crate::catalog::{ParamSpec, QueryDescriptor};
use crate::error::ValidationError;
use crate::lex::{command, int_then_text};
use crate::store::Value;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Command {
    pub verb: String,
    pub argument: String,
}

/// Splits a raw line on its first whitespace run. The verb is case-folded,
/// the argument keeps its case. Blank lines give `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let (_, (verb, argument)) = command(line).ok()?;
    Some(Command {
        verb: verb.to_lowercase(),
        argument: argument.trim_end().to_string(),
    })
}

/// Values taken from a command's argument string, in declared order, with any
/// notices raised while falling back to defaults.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Arguments {
    pub values: Vec<Value>,
    pub warnings: Vec<String>,
}

/// Reads the positional parameters of `desc` out of `argument`.
///
/// Parameters are consumed left to right. The last text parameter takes the
/// rest of the line; every earlier parameter is an unsigned integer matched
/// as `<digits> <rest>`. A parameter with a default may be left out, and a bad
/// value for it falls back to the default with a warning.
pub fn parse_arguments(desc: &QueryDescriptor, argument: &str) -> Result<Arguments, ValidationError> {
    let specs: Vec<&ParamSpec> = desc.arguments().collect();
    let mut args = Arguments::default();
    let mut rest = argument.trim();

    for (i, spec) in specs.iter().enumerate() {
        let last = i + 1 == specs.len();

        if rest.is_empty() {
            match spec.default {
                Some(d) => {
                    args.values.push(spec.accept_int(d)?);
                    continue;
                },
                None => return Err(ValidationError::Missing { param: spec.name, usage: desc.usage }),
            }
        }

        if last {
            let value = match (spec.validate(rest), spec.default) {
                (Ok(v), _) => v,
                (Err(e), Some(d)) => {
                    args.warnings.push(format!("Warning: {} Defaulting to {}.", e, d));
                    spec.accept_int(d)?
                },
                (Err(e), None) => return Err(e),
            };
            args.values.push(value);
            rest = "";
        } else {
            // only a count can lead a compound argument: `<digits> <rest>`
            let (_, (n, remainder)) = int_then_text(rest)
                .map_err(|_| ValidationError::Malformed { usage: desc.usage })?;
            args.values.push(spec.accept_int(n)?);
            rest = remainder;
        }
    }

    if !rest.is_empty() {
        log::debug!("{}: ignoring extra argument '{}'", desc.name, rest);
    }
    Ok(args)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::{Catalog, CatalogOptions};

    fn catalog() -> Catalog {
        Catalog::new(&CatalogOptions::default())
    }

    fn args(verb: &str, argument: &str) -> Result<Arguments, ValidationError> {
        let c = catalog();
        parse_arguments(c.lookup(verb).unwrap(), argument)
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("SCORE  Kansas City Chiefs "),
            Some(Command { verb: "score".to_string(), argument: "Kansas City Chiefs".to_string() })
        );
        assert_eq!(
            parse_command("win"),
            Some(Command { verb: "win".to_string(), argument: String::new() })
        );
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command(" \t "), None);
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(args("win", "").unwrap(), Arguments::default());
        assert_eq!(args("win", "ignored").unwrap().values, vec![]);
    }

    #[test]
    fn test_required_text() {
        assert_eq!(
            args("tds", "00-0033873").unwrap().values,
            vec![Value::Text("00-0033873".to_string())]
        );
        assert_eq!(
            args("ypc", "Christian McCaffrey").unwrap().values,
            vec![Value::Text("Christian McCaffrey".to_string())]
        );
        assert_eq!(
            args("tds", ""),
            Err(ValidationError::Missing { param: "player id", usage: "tds <player id>" })
        );
        assert_eq!(
            args("ref_pen", "kc").unwrap().values,
            vec![Value::Text("KC".to_string())]
        );
    }

    #[test]
    fn test_required_integer() {
        assert_eq!(args("tdp", "7").unwrap().values, vec![Value::Int(7)]);
        assert_eq!(args("tdp", "abc"), Err(ValidationError::NotAnInteger { param: "week number" }));
        assert_eq!(
            args("tdp", "40"),
            Err(ValidationError::OutOfRange { param: "week number", min: 1, max: 22 })
        );
    }

    #[test]
    fn test_optional_integer() {
        assert_eq!(args("top", "").unwrap().values, vec![Value::Int(3)]);
        assert_eq!(args("top", "5").unwrap().values, vec![Value::Int(5)]);

        let a = args("top", "five").unwrap();
        assert_eq!(a.values, vec![Value::Int(3)]);
        assert_eq!(a.warnings.len(), 1);
        assert!(a.warnings[0].contains("Defaulting to 3"));
    }

    #[test]
    fn test_compound_argument() {
        assert_eq!(
            args("plyr_yds", "300 NFC North").unwrap().values,
            vec![Value::Int(300), Value::Text("NFC North".to_string())]
        );
        assert_eq!(
            args("plyr_yds", "300"),
            Err(ValidationError::Malformed { usage: "plyr_yds <max yds> <division>" })
        );
        assert_eq!(
            args("plyr_yds", "NFC North 300"),
            Err(ValidationError::Malformed { usage: "plyr_yds <max yds> <division>" })
        );
        assert_eq!(
            args("plyr_yds", "-5 NFC North"),
            Err(ValidationError::Malformed { usage: "plyr_yds <max yds> <division>" })
        );
        assert_eq!(
            args("plyr_yds", "+5 NFC North"),
            Err(ValidationError::Malformed { usage: "plyr_yds <max yds> <division>" })
        );
        assert_eq!(
            args("plyr_yds", ""),
            Err(ValidationError::Missing { param: "max yards", usage: "plyr_yds <max yds> <division>" })
        );
    }
}
