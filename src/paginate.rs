use std::io::Write;
use std::num::NonZeroUsize;
use std::ops::Range;

use crate::error::{CommandError, InputError};
use crate::lex::{nav_token, NavToken};
use crate::prompt::InputSource;
use crate::table::{render_from, Row};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NavError {
    OutOfRange { total_pages: usize },
    Unrecognized,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Step {
    Show,
    Quit,
}

/// Page position over an already-materialized list.
#[derive(Debug)]
pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: NonZeroUsize,
    current: usize,
}

pub fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    let size = page_size.get();
    (count / size + usize::from(count % size != 0)).max(1)
}

impl<'a, T> Paginator<'a, T> {
    pub fn new(items: &'a [T], page_size: NonZeroUsize) -> Self {
        Paginator { items, page_size, current: 1 }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.items.len(), self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Index range of the current page.
    pub fn bounds(&self) -> Range<usize> {
        let size = self.page_size.get();
        let start = (self.current - 1).saturating_mul(size);
        let end = start.saturating_add(size).min(self.items.len());
        start.min(end)..end
    }

    pub fn page(&self) -> &'a [T] {
        &self.items[self.bounds()]
    }

    /// Applies one navigation token. A rejected token leaves the page as it was.
    pub fn apply(&mut self, token: NavToken) -> Result<Step, NavError> {
        let total = self.total_pages();
        match token {
            NavToken::Quit => return Ok(Step::Quit),
            NavToken::Next => self.current = (self.current + 1).min(total),
            NavToken::Prev => self.current = self.current.saturating_sub(1).max(1),
            NavToken::Page(k) => {
                if k < 1 || k as usize > total {
                    return Err(NavError::OutOfRange { total_pages: total });
                }
                self.current = k as usize;
            },
        }
        Ok(Step::Show)
    }

    /// Parses and applies raw user input.
    pub fn navigate(&mut self, input: &str) -> Result<Step, NavError> {
        let token = nav_token(input).map(|(_, t)| t).map_err(|_| NavError::Unrecognized)?;
        self.apply(token)
    }
}

/// Browses `rows` page by page, reading navigation from `input`. Leaves on
/// `q`, or when input ends.
pub fn browse(
    columns: &[String],
    rows: &[Row],
    page_size: NonZeroUsize,
    noun: &str,
    input: &mut dyn InputSource,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    if rows.is_empty() {
        writeln!(out, "No {} found in the database.", noun)?;
        return Ok(());
    }

    let mut pager = Paginator::new(rows, page_size);
    show_page(&pager, columns, out)?;

    loop {
        writeln!(
            out,
            "\nTotal {}: {}. Total pages: {} (Size: {} {}/page)",
            noun, pager.len(), pager.total_pages(), pager.page_size(), noun
        )?;
        out.flush()?;

        let prompt = format!(
            "Enter page number (1 to {}, 'n' for next, 'p' for previous, 'q' to quit list) (Current: {}): ",
            pager.total_pages(),
            pager.current_page()
        );
        let line = match input.read_line(&prompt) {
            Ok(line) => line,
            Err(InputError::Eof) | Err(InputError::Interrupted) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        match pager.navigate(&line) {
            Ok(Step::Quit) => return Ok(()),
            Ok(Step::Show) => show_page(&pager, columns, out)?,
            Err(NavError::OutOfRange { total_pages }) => {
                writeln!(out, "Invalid page number. Must be between 1 and {}.", total_pages)?
            },
            Err(NavError::Unrecognized) => {
                writeln!(out, "Invalid input. Enter a number or 'n', 'p', or 'q'.")?
            },
        }
    }
}

fn show_page(pager: &Paginator<'_, Row>, columns: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
    let bounds = pager.bounds();
    writeln!(
        out,
        "\nDisplaying Page {} (Rows {} to {})",
        pager.current_page(), bounds.start + 1, bounds.end
    )?;
    write!(out, "{}", render_from(columns, pager.page(), bounds.start + 1))?;
    Ok(())
}
