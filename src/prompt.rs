//! Interactive input: the line source shared by the command loop, parameter
//! prompts and paging sessions, and the retry loop that asks for a parameter.

use std::collections::VecDeque;
use std::io::Write;

use rustyline::Editor;

use crate::catalog::{ParamKind, ParamSpec};
use crate::error::{CommandError, InputError};
use crate::store::Value;

pub trait InputSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError>;
}

/// The terminal, through rustyline.
pub struct Console {
    editor: Editor<()>,
}

impl Console {
    pub fn new() -> Self {
        Console { editor: Editor::<()>::new() }
    }

    /// Reads a command line and records it in history.
    pub fn read_command(&mut self, prompt: &str) -> Result<String, InputError> {
        let line = self.editor.readline(prompt)?;
        if !line.trim().is_empty() {
            self.editor.add_history_entry(line.as_str());
        }
        Ok(line)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for Console {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        Ok(self.editor.readline(prompt)?)
    }
}

/// A fixed list of answers, for tests and non-interactive runs. Prompts are
/// recorded so callers can check what was asked.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where I: IntoIterator<Item = S>, S: Into<String> {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front().ok_or(InputError::Eof)
    }
}

/// Asks for `spec` until a valid answer arrives. A blank answer takes the
/// default when there is one. Only the end of input (or Ctrl-C) leaves the
/// loop without a value.
pub fn ask(
    spec: &ParamSpec,
    input: &mut dyn InputSource,
    out: &mut dyn Write,
) -> Result<Value, CommandError> {
    let text = match spec.default {
        Some(d) => format!("{} (Default: {}): ", spec.prompt, d),
        None => match &spec.kind {
            ParamKind::Choice(choices) => {
                let values: Vec<String> = choices.iter().map(|c| c.value.to_string()).collect();
                format!("{} [{}]: ", spec.prompt, values.join("/"))
            },
            _ => format!("{}: ", spec.prompt),
        },
    };

    loop {
        if let ParamKind::Choice(choices) = &spec.kind {
            for c in choices.iter() {
                writeln!(out, "> [{}] {}", c.value, c.label)?;
            }
        }
        out.flush()?;

        let answer = input.read_line(&text)?;
        let answer = answer.trim();

        if answer.is_empty() {
            if let Some(d) = spec.default {
                return Ok(Value::Int(d));
            }
        }

        match spec.validate(answer) {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(out, "Invalid input. {}", e)?,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ask_with(spec: &ParamSpec, answers: &[&str]) -> (Result<Value, CommandError>, ScriptedInput, String) {
        let mut input = ScriptedInput::new(answers.iter().copied());
        let mut out = Vec::new();
        let r = ask(spec, &mut input, &mut out);
        (r, input, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_blank_takes_default() {
        let spec = ParamSpec::season("Enter Season Year", 2023);
        let (r, input, _) = ask_with(&spec, &[""]);

        assert_eq!(r.unwrap(), Value::Int(2023));
        assert_eq!(input.prompts, vec!["Enter Season Year (Default: 2023): ".to_string()]);
    }

    #[test]
    fn test_retries_until_valid() {
        let spec = ParamSpec::season("Enter Season Year", 2023);
        let (r, input, out) = ask_with(&spec, &["abc", "1800", "2022"]);

        assert_eq!(r.unwrap(), Value::Int(2022));
        assert_eq!(input.prompts.len(), 3);
        assert!(input.prompts.iter().all(|p| p == &input.prompts[0]));
        assert!(out.contains("Invalid input. Season year must be an integer."));
        assert!(out.contains("Season year must be between 1920 and 2100."));
    }

    #[test]
    fn test_choice_menu() {
        let spec = ParamSpec::season_type();
        let (r, input, out) = ask_with(&spec, &["", "3", "1"]);

        assert_eq!(r.unwrap(), Value::Int(1));
        assert_eq!(input.prompts[0], "Enter season type [1/2]: ");
        assert_eq!(out.matches("> [1] Regular Season").count(), 3);
        assert_eq!(out.matches("Please enter one of 1 or 2.").count(), 2);
    }

    #[test]
    fn test_keeps_asking() {
        let spec = ParamSpec::season_type();
        let mut answers = vec!["x"; 8];
        answers.push("2");
        let (r, input, out) = ask_with(&spec, &answers);

        assert_eq!(r.unwrap(), Value::Int(2));
        assert_eq!(input.prompts.len(), 9);
        assert_eq!(input.remaining(), 0);
        assert_eq!(out.matches("Please enter one of 1 or 2.").count(), 8);
    }

    #[test]
    fn test_bad_answers_then_end_of_input() {
        let spec = ParamSpec::season("Enter Season Year", 2023);
        let (r, input, _) = ask_with(&spec, &["x"; 7]);

        assert!(matches!(r, Err(CommandError::Input(InputError::Eof))));
        assert_eq!(input.prompts.len(), 8);
    }

    #[test]
    fn test_end_of_input() {
        let spec = ParamSpec::season("Enter Season Year", 2023);
        let (r, _, _) = ask_with(&spec, &[]);
        assert!(matches!(r, Err(CommandError::Input(InputError::Eof))));
    }
}
