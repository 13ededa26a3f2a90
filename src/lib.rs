pub use account::Account;
pub use config::{load_config, load_config_or_default, Config};
pub use error::{CommandError, ConfigError, ContainerError, SessionError};
pub use session::{Session, TodoDetails};

pub mod account;
pub mod arena;
pub mod bst;
pub mod buffer;
pub mod command;
pub mod config;
pub mod error;
pub mod graph;
pub mod hash_table;
pub mod key;
pub mod mailbox;
pub mod notebook;
pub mod session;
