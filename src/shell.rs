#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! A line-oriented front end for a [`RecordStore`].
//!
//! The shell only turns text into store calls and store results into text; it
//! never touches the store's contents directly.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{
    Table,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use crate::{
    error::StoreError,
    events::EventSink,
    export::DEFAULT_EXPORT_PATH,
    store::{AddOutcome, RecordStore},
};

/// Shown by `help`.
const HELP: &str = "\
Commands:
  add <name> <grade>      record a grade (replaces an existing one)
  update <name> <grade>   change the grade of a student on record
  delete <name>           remove a student
  view [--json]           list every student
  export [path]           write all grades to a CSV file
  help                    show this message
  exit                    quit
Names containing spaces may be wrapped in double quotes.";

/// Problems with a command line that are caught before the store is called.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InputWarning {
    /// The name field was empty.
    #[error("Student name cannot be empty.")]
    EmptyName,
    /// The grade field was empty.
    #[error("Grade cannot be empty.")]
    EmptyGrade,
    /// A double quote was opened but never closed.
    #[error("Unterminated quote in `{0}`.")]
    UnterminatedQuote(String),
    /// The command word is not known.
    #[error("Unknown command `{0}`. Type `help` for a list of commands.")]
    UnknownCommand(String),
    /// The command got arguments it does not take.
    #[error("Usage: {0}")]
    Usage(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A parsed command line.
pub enum Command {
    /// `add <name> <grade>`
    Add {
        /// student name, trimmed
        name:  String,
        /// grade text, parsed by the store
        grade: String,
    },
    /// `update <name> <grade>`
    Update {
        /// student name, trimmed
        name:  String,
        /// grade text, parsed by the store
        grade: String,
    },
    /// `delete <name>`
    Delete {
        /// student name, trimmed
        name: String,
    },
    /// `view [--json]`
    View {
        /// print JSON instead of a table
        json: bool,
    },
    /// `export [path]`
    Export {
        /// destination, defaults to the shell's export path
        path: Option<PathBuf>,
    },
    /// `help`
    Help,
    /// `exit` or `quit`
    Exit,
    /// A blank line.
    Nothing,
}

impl Command {
    /// Parses one line of input.
    pub fn parse(line: &str) -> Result<Self, InputWarning> {
        let words = split_words(line)?;
        let Some((cmd, args)) = words.split_first() else {
            return Ok(Command::Nothing);
        };

        match cmd.to_ascii_lowercase().as_str() {
            "add" => {
                let (name, grade) = name_and_grade(args)?;
                Ok(Command::Add { name, grade })
            }
            "update" => {
                let (name, grade) = name_and_grade(args)?;
                Ok(Command::Update { name, grade })
            }
            "delete" | "remove" => {
                let name = args.join(" ").trim().to_owned();
                if name.is_empty() {
                    return Err(InputWarning::EmptyName);
                }
                Ok(Command::Delete { name })
            }
            "view" | "list" => match args {
                [] => Ok(Command::View { json: false }),
                [flag] if flag == "--json" => Ok(Command::View { json: true }),
                _ => Err(InputWarning::Usage("view [--json]")),
            },
            "export" => match args {
                [] => Ok(Command::Export { path: None }),
                [path] => Ok(Command::Export {
                    path: Some(PathBuf::from(path)),
                }),
                _ => Err(InputWarning::Usage("export [path]")),
            },
            "help" | "?" => Ok(Command::Help),
            "exit" | "quit" => Ok(Command::Exit),
            other => Err(InputWarning::UnknownCommand(other.to_owned())),
        }
    }
}

/// Splits `args` into a name and a grade: the last word is the grade, the rest
/// is the name.
fn name_and_grade(args: &[String]) -> Result<(String, String), InputWarning> {
    match args {
        [] => Err(InputWarning::EmptyName),
        [name] => {
            if name.trim().is_empty() {
                Err(InputWarning::EmptyName)
            } else {
                Err(InputWarning::EmptyGrade)
            }
        }
        [name @ .., grade] => {
            let name = name.join(" ").trim().to_owned();
            let grade = grade.trim().to_owned();
            if name.is_empty() {
                Err(InputWarning::EmptyName)
            } else if grade.is_empty() {
                Err(InputWarning::EmptyGrade)
            } else {
                Ok((name, grade))
            }
        }
    }
}

/// Splits a line on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>, InputWarning> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(InputWarning::UnterminatedQuote(line.trim().to_owned()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Whether the shell should keep reading after a command.
pub enum Flow {
    /// read the next line
    Continue,
    /// stop reading
    Exit,
}

/// Drives a [`RecordStore`] from lines of text.
pub struct Shell<S: EventSink, W: Write> {
    /// the store being managed
    store:       RecordStore<S>,
    /// where results are written
    out:         W,
    /// used by `export` without an argument
    export_path: PathBuf,
    /// whether to style output with terminal colors
    color:       bool,
    /// whether to print a prompt before reading
    prompt:      bool,
}

impl<S: EventSink, W: Write> Shell<S, W> {
    /// Creates a shell over `store`, writing plain output to `out`.
    pub fn new(store: RecordStore<S>, out: W) -> Self {
        Self {
            store,
            out,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            color: false,
            prompt: false,
        }
    }

    /// Sets the path `export` writes to when given none.
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    /// Enables or disables terminal colors.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Enables or disables the `> ` prompt.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Returns the store.
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// Consumes the shell, returning the store and the output.
    pub fn into_parts(self) -> (RecordStore<S>, W) {
        (self.store, self.out)
    }

    /// Reads and runs commands until `exit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(self.out, "> ").context("Could not write prompt")?;
                self.out.flush().context("Could not flush output")?;
            }

            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Could not read command")?;

            if self.execute(&line)? == Flow::Exit {
                break;
            }
        }

        tracing::info!("Application closed by user.");
        Ok(())
    }

    /// Runs one command line and writes its result.
    ///
    /// Store failures and input warnings are written as messages; only errors
    /// writing the output itself are returned.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(warning) => {
                self.warn(&warning.to_string())?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Add { name, grade } => match self.store.add(&name, grade.as_str()) {
                Ok(outcome) => {
                    let grade = self.recorded_grade(&name, &grade);
                    let message = match outcome {
                        AddOutcome::Inserted => format!("Added {name} with grade {grade}"),
                        AddOutcome::Overwritten { previous } => format!(
                            "Added {name} with grade {grade} (replaced previous grade {previous})"
                        ),
                    };
                    self.say(&message)?
                }
                Err(e) => self.fail(&e)?,
            },
            Command::Update { name, grade } => match self.store.update(&name, grade.as_str()) {
                Ok(_) => {
                    let grade = self.recorded_grade(&name, &grade);
                    self.say(&format!("Updated {name} with new grade {grade}"))?
                }
                Err(e) => self.fail(&e)?,
            },
            Command::Delete { name } => match self.store.delete(&name) {
                Ok(_) => self.say(&format!("Deleted {name}"))?,
                Err(e) => self.fail(&e)?,
            },
            Command::View { json } => self.view(json)?,
            Command::Export { path } => {
                let path = path.unwrap_or_else(|| self.export_path.clone());
                match self.store.export_csv(&path) {
                    Ok(path) => {
                        self.say(&format!("Exported student data to {}", path.display()))?
                    }
                    Err(e) => self.fail(&e)?,
                }
            }
            Command::Help => self.say(HELP)?,
            Command::Exit => return Ok(Flow::Exit),
            Command::Nothing => {}
        }

        Ok(Flow::Continue)
    }

    /// Returns the grade now on record for `name` as text, falling back to what
    /// the user typed.
    fn recorded_grade(&self, name: &str, typed: &str) -> String {
        self.store
            .get(name)
            .map_or_else(|| typed.trim().to_owned(), |grade| grade.to_string())
    }

    /// Writes every record as a table, or as JSON.
    fn view(&mut self, json: bool) -> Result<()> {
        let records = self.store.list_all();

        if json {
            let text =
                serde_json::to_string_pretty(&records).context("Could not serialize records")?;
            return self.say(&text);
        }

        if records.is_empty() {
            tracing::info!("No student records to display.");
            return self.say("No students found.");
        }

        let count = records.len();
        let table = Table::new(&records)
            .with(Panel::footer(format!("{count} student(s)")))
            .with(
                Modify::new(Rows::last())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(Style::modern())
            .to_string();
        self.say(&table)
    }

    /// Writes a line of normal output.
    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("Could not write output")
    }

    /// Writes an input warning.
    fn warn(&mut self, text: &str) -> Result<()> {
        let text = format!("warning: {text}");
        let text = if self.color {
            text.yellow().to_string()
        } else {
            text
        };
        self.say(&text)
    }

    /// Writes a store failure. Bad input is shown as a warning, anything else
    /// as an error.
    fn fail(&mut self, error: &StoreError) -> Result<()> {
        if error.is_rejected_input() {
            return self.warn(&error.to_string());
        }
        let text = format!("error: {error}");
        let text = if self.color {
            text.red().bold().to_string()
        } else {
            text
        };
        self.say(&text)
    }
}
