//! Console commands.
//!
//! A command line is a keyword followed by an optional value, e.g. `do buy milk`.
//! The keyword is the first whitespace-separated word; the value is the rest of the line.

use indoc::indoc;
use logos::Logos;

use crate::error::CommandError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    #[token("exit")]
    Exit,
    #[token("help")]
    Help,
    #[token("login")]
    Login,
    #[token("logout")]
    Logout,
    /// Add user.
    #[token("au")]
    AddUser,
    /// Remove user.
    #[token("ru")]
    RemoveUser,
    #[token("do")]
    AddTodo,
    /// Create notebook.
    #[token("cn")]
    CreateNotebook,
    /// Add a note to a notebook.
    #[token("an")]
    AddNote,
    /// Open notebook.
    #[token("on")]
    OpenNotebook,
    /// Send notebook.
    #[token("sn")]
    SendNotebook,
    #[token("import")]
    Import,
    #[token("todos")]
    Todos,
    /// Todo details.
    #[token("dt")]
    TodoDetails,
    /// Remove notebook.
    #[token("rn")]
    RemoveNotebook,
    /// Undo notebook delete.
    #[token("un")]
    UndoNotebookDelete,
    /// Remove todo.
    #[token("rt")]
    RemoveTodo,
    /// What to do.
    #[token("wtd")]
    WhatToDo,
    /// Sort todos by id.
    #[token("sid")]
    SortById,
    /// Sort todos by most possible.
    #[token("smp")]
    SortByDoability,
}

impl Keyword {
    pub fn name(self) -> &'static str {
        match self {
            Keyword::Exit => "exit",
            Keyword::Help => "help",
            Keyword::Login => "login",
            Keyword::Logout => "logout",
            Keyword::AddUser => "au",
            Keyword::RemoveUser => "ru",
            Keyword::AddTodo => "do",
            Keyword::CreateNotebook => "cn",
            Keyword::AddNote => "an",
            Keyword::OpenNotebook => "on",
            Keyword::SendNotebook => "sn",
            Keyword::Import => "import",
            Keyword::Todos => "todos",
            Keyword::TodoDetails => "dt",
            Keyword::RemoveNotebook => "rn",
            Keyword::UndoNotebookDelete => "un",
            Keyword::RemoveTodo => "rt",
            Keyword::WhatToDo => "wtd",
            Keyword::SortById => "sid",
            Keyword::SortByDoability => "smp",
        }
    }

    pub fn requires_login(self) -> bool {
        !matches!(
            self,
            Keyword::Exit
                | Keyword::Help
                | Keyword::Login
                | Keyword::Logout
                | Keyword::AddUser
                | Keyword::RemoveUser
        )
    }

    pub fn requires_value(self) -> bool {
        matches!(
            self,
            Keyword::AddTodo
                | Keyword::CreateNotebook
                | Keyword::AddNote
                | Keyword::OpenNotebook
                | Keyword::SendNotebook
                | Keyword::TodoDetails
                | Keyword::RemoveNotebook
                | Keyword::RemoveTodo
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub keyword: Keyword,
    pub value: &'a str,
}

impl Command<'_> {
    /// The value as a todo id.
    pub fn id(&self) -> Result<u32, CommandError> {
        self.value.parse().map_err(|_| CommandError::InvalidId {
            value: self.value.to_string(),
        })
    }
}

pub fn parse_command(line: &str) -> Result<Command<'_>, CommandError> {
    let line = line.trim();
    let (word, value) = match line.split_once(char::is_whitespace) {
        Some((word, value)) => (word, value.trim()),
        None => (line, ""),
    };
    if word.is_empty() {
        return Err(CommandError::Empty);
    }

    // The token must cover the whole word, otherwise "dox" would lex as "do".
    let mut lexer = Keyword::lexer(word);
    let keyword = match lexer.next() {
        Some(Ok(keyword)) if lexer.span() == (0..word.len()) => keyword,
        _ => {
            return Err(CommandError::Unknown {
                command: word.to_string(),
            })
        }
    };

    if keyword.requires_value() && value.is_empty() {
        return Err(CommandError::MissingValue {
            command: keyword.name(),
        });
    }

    Ok(Command { keyword, value })
}

pub const HELP: &str = indoc! {"
    exit            leave the program
    help            show this help
    login / logout  switch the active account
    au              add a user account
    ru              remove a user account
    do <todo>       add a todo and pick the todos that depend on it
    todos           list todos
    dt <id>         show a todo and what it depends on
    rt <id>         remove a todo
    wtd             show what can be done right now
    sid             sort todos by id
    smp             sort todos by most possible to do
    cn <title>      create a notebook
    an <note>       add a note to a notebook
    on <title>      open a notebook
    rn <title>      remove a notebook
    un              undo the last notebook removal
    sn <title>      send a notebook to another user
    import          accept or reject notebooks sent to you
"};
