use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("Duplicate id: {id}")]
    DuplicateKey { id: u32 },

    #[error("A record with the same key already exists")]
    DuplicateRecord,

    #[error("Vertex not found: {id}")]
    VertexNotFound { id: u32 },

    #[error("A vertex cannot depend on itself: {id}")]
    SelfLoop { id: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("You must login first")]
    NotLoggedIn,

    #[error("Username already exists: {username:?}")]
    UsernameTaken { username: String },

    #[error("Account not found: {username:?}")]
    AccountNotFound { username: String },

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Todo already exists: {todo:?}")]
    DuplicateTodo { todo: String },

    #[error("Todo not found: {id}")]
    TodoNotFound { id: u32 },

    #[error("Notebook not found: {title:?}")]
    NotebookNotFound { title: String },

    #[error("Notebook already exists: {title:?}")]
    NotebookExists { title: String },

    #[error("Nothing to undo")]
    TrashEmpty,

    #[error("No notebook is waiting for import")]
    InboxEmpty,

    #[error("Mailbox of {username:?} is full")]
    MailboxFull { username: String },

    /// The receiving account was dropped while its address was still held.
    #[error("Mailbox of {username:?} is closed")]
    MailboxClosed { username: String },

    #[error(transparent)]
    Container(#[from] ContainerError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Invalid command: {command:?}")]
    Unknown { command: String },

    #[error("Command value cannot be empty. Try \"{command} <value>\"")]
    MissingValue { command: &'static str },

    #[error("Invalid todo id: {value:?}")]
    InvalidId { value: String },
}
