use std::io::{self, BufRead, Write};

use clap::Parser;
use programmers_notes::command::{parse_command, Command, Keyword, HELP};
use programmers_notes::{load_config_or_default, CommandError, Session, SessionError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Accounts, todo dependencies and notebooks in the console.")]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Error, Debug)]
enum Failure {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Input closed")]
    Closed,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn prompt(&mut self, label: &str) -> Result<String, Failure> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Failure::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Asks until a number is entered.
    fn prompt_number(&mut self, label: &str) -> Result<u32, Failure> {
        loop {
            match self.prompt(label)?.parse() {
                Ok(number) => return Ok(number),
                Err(_) => self.warning("Please enter a number!")?,
            }
        }
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    fn heading(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "\n{text}")
    }

    fn success(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "[ok] {text}")
    }

    fn warning(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "[!] {text}")
    }

    fn error(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "[error] {text}")
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = load_config_or_default(args.config.as_deref());
    let mut session = Session::new(config);
    let mut console = Console {
        input: io::stdin().lock(),
        output: io::stdout().lock(),
    };

    match run(&mut session, &mut console) {
        Ok(()) | Err(Failure::Closed) => Ok(()),
        Err(Failure::Io(e)) => Err(e),
        Err(e) => {
            console.error(&e.to_string())?;
            Ok(())
        }
    }
}

fn run<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<(), Failure> {
    console.heading("You need to create an account first!")?;
    register(session, console)?;

    console.heading("# Login")?;
    if let Err(e) = login(session, console) {
        console.error(&e.to_string())?;
        console.error("Login failed!")?;
        return Ok(());
    }

    loop {
        let header = match session.active_account() {
            Ok(account) => format!(
                "# Programmers Notes: {}",
                account.username().to_uppercase()
            ),
            Err(_) => "# Programmers Notes: Not logged in".to_string(),
        };
        console.heading(&header)?;

        let line = console.prompt("> ")?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                console.warning(&e.to_string())?;
                console.line("For more info: type \"help\"")?;
                continue;
            }
        };

        if command.keyword == Keyword::Exit {
            return Ok(());
        }
        if command.keyword.requires_login() && !session.is_logged_in() {
            console.warning(&SessionError::NotLoggedIn.to_string())?;
            continue;
        }

        match dispatch(session, console, command) {
            Ok(()) => {}
            Err(Failure::Session(e)) => console.error(&e.to_string())?,
            Err(Failure::Command(e)) => console.warning(&e.to_string())?,
            Err(e) => return Err(e),
        }
    }
}

fn dispatch<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
    command: Command<'_>,
) -> Result<(), Failure> {
    match command.keyword {
        Keyword::Exit => {}
        Keyword::Help => {
            console.heading("# Help")?;
            console.line(HELP)?;
        }
        Keyword::Login => {
            if session.is_logged_in() {
                console.warning("Already logged in!")?;
            } else {
                login(session, console)?;
            }
        }
        Keyword::Logout => {
            if session.logout() {
                console.success("Logged out!")?;
            } else {
                console.warning("Not logged in!")?;
            }
        }
        Keyword::AddUser => {
            console.heading("Create new user account")?;
            register(session, console)?;
        }
        Keyword::RemoveUser => {
            console.heading("Remove user account")?;
            let username = console.prompt("Username: ")?;
            session.remove_account(&username)?;
            console.success("Account removed!")?;
        }
        Keyword::AddTodo => add_todo(session, console, command.value)?,
        Keyword::CreateNotebook => {
            session.create_notebook(command.value)?;
            console.success("Notebook added!")?;
        }
        Keyword::AddNote => {
            console.heading("Notebook available:")?;
            for title in session.notebook_titles()? {
                console.line(title)?;
            }
            let title = console.prompt("Please select a notebook: ")?;
            session.add_note(&title, command.value)?;
            console.success("Note added!")?;
        }
        Keyword::OpenNotebook => {
            let notebook = session.open_notebook(command.value)?;
            console.heading(notebook.title())?;
            for note in notebook.content() {
                console.line(&format!("- {note}"))?;
            }
        }
        Keyword::SendNotebook => {
            let username = console.prompt("Send to user: ")?;
            session.send_notebook(command.value, &username)?;
            console.success("Notebook sent!")?;
        }
        Keyword::Import => import(session, console)?,
        Keyword::Todos => print_todos(session, console)?,
        Keyword::TodoDetails => {
            let details = session.todo_details(command.id()?)?;
            console.heading("Todo Details")?;
            console.line(&format!("- Todo Id: {}", details.id))?;
            console.line(&format!("- Todo: {}", details.todo))?;
            console.line("- Depends on:")?;
            for (id, todo) in &details.depends_on {
                console.line(&format!("\t- [{id}] {todo}"))?;
            }
        }
        Keyword::RemoveNotebook => {
            if session.remove_notebook(command.value)? {
                console.success("Notebook removed!")?;
            } else {
                console.warning("Notebook removed, but it cannot be restored!")?;
            }
        }
        Keyword::UndoNotebookDelete => {
            let title = session.undo_notebook_delete()?;
            console.success(&format!("Notebook restored: {title}"))?;
        }
        Keyword::RemoveTodo => {
            session.remove_todo(command.id()?)?;
            console.success("Todo removed!")?;
        }
        Keyword::WhatToDo => {
            if session.todos()?.is_empty() {
                console.success("Nothing to do! Todo list is empty!")?;
            } else {
                console.heading("No  Todo")?;
                for (i, todo) in session.what_to_do()?.into_iter().enumerate() {
                    console.line(&format!("{}.  {todo}", i + 1))?;
                }
            }
        }
        Keyword::SortById => {
            console.heading("Sort todo list by Id")?;
            session.sort_todos_by_id()?;
            print_todos(session, console)?;
        }
        Keyword::SortByDoability => {
            console.heading("Sort todo list by most possible")?;
            session.sort_todos_by_doability()?;
            print_todos(session, console)?;
        }
    }
    Ok(())
}

fn register<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<(), Failure> {
    let username = console.prompt("Username: ")?;
    let password = console.prompt("Password: ")?;
    session.register(&username, &password)?;
    console.success("Account created!")?;
    Ok(())
}

fn login<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<(), Failure> {
    let username = console.prompt("Username: ")?;
    let password = console.prompt("Password: ")?;
    session.login(&username, &password)?;
    Ok(())
}

fn add_todo<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
    todo: &str,
) -> Result<(), Failure> {
    let id = session.add_todo(todo)?;

    if session.todos()?.len() > 1 {
        loop {
            console.heading(&format!("# Todos Relationship: {todo}"))?;
            console.line("ID Todo")?;
            for candidate in session.dependent_candidates(id)? {
                console.line(&format!("{}. {}", candidate.id(), candidate.data()))?;
            }

            let dependent = console.prompt_number("Todo id that depends on this: (0 to skip) ")?;
            if dependent == 0 {
                break;
            }
            if let Err(e) = session.add_dependent(id, dependent) {
                console.error(&e.to_string())?;
            }
        }
    }

    console.success("Todo added!")?;
    Ok(())
}

fn import<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> Result<(), Failure> {
    while let Some(notebook) = session.pending_import()? {
        console.heading(notebook.title())?;
        for note in notebook.content() {
            console.line(&format!("- {note}"))?;
        }

        console.line("0. Exit\n1. Accept\n2. Reject")?;
        match console.prompt_number("Choice: ")? {
            0 => return Ok(()),
            1 => match session.accept_import() {
                Ok(title) => console.success(&format!("Notebook accepted: {title}"))?,
                Err(e) => console.error(&e.to_string())?,
            },
            2 => {
                let title = session.reject_import()?;
                console.warning(&format!("Notebook rejected: {title}"))?;
            }
            _ => console.warning("Invalid choice!")?,
        }
    }

    console.warning("Queue is empty!")?;
    Ok(())
}

fn print_todos<R: BufRead, W: Write>(
    session: &Session,
    console: &mut Console<R, W>,
) -> Result<(), Failure> {
    console.heading("Todos")?;
    console.line("ID  Todo")?;
    for vertex in session.todos()?.iter() {
        console.line(&format!("{}.  {}", vertex.id(), vertex.data()))?;
    }
    Ok(())
}
