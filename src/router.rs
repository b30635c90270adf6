use std::io::Write;

use log::{debug, error, warn};

use crate::catalog::{Catalog, ExistenceCheck, QueryDescriptor, SEASON};
use crate::error::{CommandError, InputError, StoreError, ValidationError};
use crate::paginate::browse;
use crate::parser::{parse_arguments, parse_command};
use crate::prompt::{ask, InputSource};
use crate::store::{Store, Value};
use crate::table::render;

/// What the command loop should do after a line has been routed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Continue,
    Quit,
    /// The store is gone; the session cannot go on.
    Disconnected,
}

pub struct CommandRouter<'a> {
    catalog: &'a Catalog,
    store: &'a dyn Store,
}

impl<'a> CommandRouter<'a> {
    pub fn new(catalog: &'a Catalog, store: &'a dyn Store) -> Self {
        CommandRouter { catalog, store }
    }

    /// Runs one command line to completion. Every failure is turned into a
    /// notice on `out`; only quitting or losing the store changes the flow.
    pub fn route(&self, line: &str, input: &mut dyn InputSource, out: &mut dyn Write) -> Flow {
        let cmd = match parse_command(line) {
            Some(cmd) => cmd,
            None => return Flow::Continue,
        };
        debug!("routing verb '{}' with argument '{}'", cmd.verb, cmd.argument);

        match cmd.verb.as_str() {
            "h" | "help" => {
                if let Err(e) = write!(out, "{}", self.catalog.help()) {
                    error!("could not write help: {}", e);
                }
                return Flow::Continue;
            },
            "q" | "quit" => {
                let _ = writeln!(out, "\nExiting NFL Database. Goodbye!");
                return Flow::Quit;
            },
            _ => {},
        }

        let desc = match self.catalog.lookup(&cmd.verb) {
            Some(desc) => desc,
            None => {
                let _ = writeln!(out, "-> Command not recognized. Type 'h' for help.");
                return Flow::Continue;
            },
        };

        match self.run(desc, &cmd.argument, input, out) {
            Ok(()) => Flow::Continue,
            Err(e) => report(desc, e, out),
        }
    }

    fn run(
        &self,
        desc: &QueryDescriptor,
        argument: &str,
        input: &mut dyn InputSource,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let args = parse_arguments(desc, argument)?;
        for w in &args.warnings {
            writeln!(out, "{}", w)?;
        }

        let mut positional = args.values.into_iter();
        let mut values = Vec::with_capacity(desc.params.len());
        for spec in &desc.params {
            let value = if spec.is_argument() {
                positional.next().ok_or(ValidationError::Missing {
                    param: spec.name,
                    usage: desc.usage,
                })?
            } else {
                ask(spec, input, out)?
            };
            values.push(value);
        }

        let query = desc.bind(values)?;

        if let Some(paging) = desc.paging {
            writeln!(out, "-> Fetching all {} data for pagination...", paging.noun)?;
            let result = self.store.execute(query.sql, &query.params)?;
            return browse(&result.columns, &result.rows, paging.page_size, paging.noun, input, out);
        }

        let result = self.store.execute(query.sql, &query.params)?;
        match &desc.existence {
            Some(check) if result.is_empty() => self.explain_empty(desc, check, &query.params, out),
            _ => {
                write!(out, "{}", render(&result.columns, &result.rows))?;
                Ok(())
            },
        }
    }

    /// Tells an unknown identifier apart from a known one with no rows for
    /// the requested season.
    fn explain_empty(
        &self,
        desc: &QueryDescriptor,
        check: &ExistenceCheck,
        params: &[Value],
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let key = match params.get(check.param) {
            Some(key) => key,
            None => {
                writeln!(out, "No results found.")?;
                return Ok(());
            },
        };

        let found = self.store.execute(check.sql, std::slice::from_ref(key))?;
        match found.first_value() {
            None => {
                writeln!(out, "Error: {} '{}' not found in the database.", check.entity, key)?;
            },
            Some(name) => {
                let season = desc.params.iter()
                                        .position(|p| p.name == SEASON)
                                        .and_then(|i| params.get(i));
                let subject = check.subject.to_lowercase();

                writeln!(out, "{}: {}", check.subject, name)?;
                match season {
                    Some(season) => writeln!(
                        out,
                        "Warning: No {} found for this {} in season {}.",
                        check.data, subject, season
                    )?,
                    None => writeln!(out, "Warning: No {} found for this {}.", check.data, subject)?,
                }
            },
        }
        Ok(())
    }
}

fn report(desc: &QueryDescriptor, err: CommandError, out: &mut dyn Write) -> Flow {
    let (flow, written) = match err {
        CommandError::Validation(e) => {
            let hint = match (&e, desc.hint) {
                (ValidationError::Missing { .. }, Some(hint)) => format!(" {}", hint),
                _ => String::new(),
            };
            (Flow::Continue, writeln!(out, "Error: {}{}", e, hint))
        },
        CommandError::Store(StoreError::Query(msg)) => {
            warn!("{} failed: {}", desc.name, msg);
            (Flow::Continue, writeln!(out, "SQL Execution Error: {}", msg))
        },
        CommandError::Store(StoreError::Connection(msg)) => {
            error!("connection lost during {}: {}", desc.name, msg);
            (Flow::Disconnected, writeln!(out, "\nDatabase connection error: {}", msg))
        },
        CommandError::Input(InputError::Eof) | CommandError::Input(InputError::Interrupted) => {
            (Flow::Continue, writeln!(out, "\nCommand cancelled."))
        },
        CommandError::Input(e) => {
            error!("input failed during {}: {}", desc.name, e);
            (Flow::Continue, writeln!(out, "Error: {}", e))
        },
        CommandError::Output(e) => {
            error!("output failed during {}: {}", desc.name, e);
            (Flow::Continue, Ok(()))
        },
    };

    if let Err(e) = written {
        error!("could not report failure of {}: {}", desc.name, e);
    }
    flow
}
