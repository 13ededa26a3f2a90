//! The state of one console session: every account, and which one is logged in.
//!
//! A `Session` is an ordinary value handed to whatever drives it. Command handlers take it
//! by reference; nothing here is global.

use tracing::{debug, info};

use crate::account::Account;
use crate::config::Config;
use crate::error::{ContainerError, SessionError};
use crate::graph::{DirectedGraph, Vertex};
use crate::hash_table::ChainedHashTable;
use crate::key::KeyStrategy;
use crate::mailbox::Delivery;
use crate::notebook::Notebook;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDetails {
    pub id: u32,
    pub todo: String,
    /// `(id, todo)` of every todo this one depends on.
    pub depends_on: Vec<(u32, String)>,
}

pub struct Session {
    config: Config,
    accounts: ChainedHashTable<Account>,
    keys: Box<dyn KeyStrategy>,
    active: Option<u32>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            accounts: ChainedHashTable::new(config.accounts.bucket_count),
            keys: config.accounts.key_strategy.build(),
            active: None,
            config,
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_logged_in(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_account(&self) -> Result<&Account, SessionError> {
        let id = self.active.ok_or(SessionError::NotLoggedIn)?;
        self.accounts
            .get_record(&id)
            .ok_or(SessionError::NotLoggedIn)
    }

    fn active_mut(&mut self) -> Result<(&mut Account, &dyn KeyStrategy), SessionError> {
        let id = self.active.ok_or(SessionError::NotLoggedIn)?;
        let account = self
            .accounts
            .get_record_mut(&id)
            .ok_or(SessionError::NotLoggedIn)?;
        Ok((account, self.keys.as_ref()))
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<u32, SessionError> {
        let id = self.keys.derive(username);
        let account = Account::new(id, username, password, &self.config);

        match self.accounts.add_record(account) {
            Ok(()) => {
                info!(username, id, "account registered");
                Ok(id)
            }
            Err(ContainerError::DuplicateRecord) => Err(SessionError::UsernameTaken {
                username: username.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let id = self.keys.derive(username);
        let account = self
            .accounts
            .get_record(&id)
            .ok_or_else(|| SessionError::AccountNotFound {
                username: username.to_string(),
            })?;

        if !account.validate_password(password) {
            return Err(SessionError::InvalidPassword);
        }

        self.active = Some(id);
        info!(username, "logged in");
        Ok(())
    }

    /// Returns whether anyone was logged in.
    pub fn logout(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Drops the account along with everything it owns.
    pub fn remove_account(&mut self, username: &str) -> Result<(), SessionError> {
        let id = self.keys.derive(username);
        self.accounts
            .remove_record(&id)
            .ok_or_else(|| SessionError::AccountNotFound {
                username: username.to_string(),
            })?;

        if self.active == Some(id) {
            self.active = None;
        }
        info!(username, "account removed");
        Ok(())
    }

    pub fn add_todo(&mut self, todo: &str) -> Result<u32, SessionError> {
        let (account, _) = self.active_mut()?;
        account.add_todo(todo)
    }

    /// Records that `dependent` depends on `todo`.
    pub fn add_dependent(&mut self, todo: u32, dependent: u32) -> Result<(), SessionError> {
        let (account, _) = self.active_mut()?;
        account.add_dependent(todo, dependent)
    }

    /// Todos that may be declared as depending on `todo`.
    pub fn dependent_candidates(&self, todo: u32) -> Result<Vec<&Vertex<String>>, SessionError> {
        Ok(self.active_account()?.dependent_candidates(todo).collect())
    }

    pub fn todos(&self) -> Result<&DirectedGraph<String>, SessionError> {
        Ok(self.active_account()?.todos())
    }

    pub fn todo_details(&self, id: u32) -> Result<TodoDetails, SessionError> {
        let todos = self.active_account()?.todos();
        let vertex = todos
            .search_by_id(id)
            .ok_or(SessionError::TodoNotFound { id })?;
        let depends_on = todos
            .dependencies_of(id)
            .into_iter()
            .flatten()
            .map(|dependency| (dependency.id(), dependency.data().clone()))
            .collect();

        Ok(TodoDetails {
            id,
            todo: vertex.data().clone(),
            depends_on,
        })
    }

    pub fn remove_todo(&mut self, id: u32) -> Result<String, SessionError> {
        let (account, _) = self.active_mut()?;
        account.remove_todo(id)
    }

    pub fn sort_todos_by_id(&mut self) -> Result<(), SessionError> {
        let (account, _) = self.active_mut()?;
        account.todos_mut().insertion_sort_by_id();
        Ok(())
    }

    pub fn sort_todos_by_doability(&mut self) -> Result<(), SessionError> {
        let (account, _) = self.active_mut()?;
        account.todos_mut().insertion_sort_by_degree_ascending();
        Ok(())
    }

    /// Todos that depend on nothing, in list order after sorting by degree.
    pub fn what_to_do(&mut self) -> Result<Vec<&str>, SessionError> {
        let (account, _) = self.active_mut()?;
        Ok(account
            .todos_mut()
            .what_to_do()
            .map(|vertex| vertex.data().as_str())
            .collect())
    }

    pub fn create_notebook(&mut self, title: &str) -> Result<(), SessionError> {
        let (account, keys) = self.active_mut()?;
        match account
            .notebooks_mut()
            .insert(keys.derive(title), Notebook::new(title))
        {
            Ok(()) => Ok(()),
            Err(ContainerError::DuplicateKey { .. }) => Err(SessionError::NotebookExists {
                title: title.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Titles of the active account's notebooks, ordered by their id.
    pub fn notebook_titles(&self) -> Result<Vec<&str>, SessionError> {
        Ok(self
            .active_account()?
            .notebooks()
            .in_order()
            .map(|(_, notebook)| notebook.title())
            .collect())
    }

    pub fn open_notebook(&self, title: &str) -> Result<&Notebook, SessionError> {
        self.active_account()?
            .notebooks()
            .search(self.keys.derive(title))
            .ok_or_else(|| SessionError::NotebookNotFound {
                title: title.to_string(),
            })
    }

    pub fn add_note(&mut self, title: &str, note: &str) -> Result<(), SessionError> {
        let (account, keys) = self.active_mut()?;
        let notebook = account
            .notebooks_mut()
            .search_mut(keys.derive(title))
            .ok_or_else(|| SessionError::NotebookNotFound {
                title: title.to_string(),
            })?;
        notebook.add_content(note);
        Ok(())
    }

    /// Deletes a notebook, keeping it for [`Session::undo_notebook_delete`].
    /// Returns whether the deletion can be undone.
    pub fn remove_notebook(&mut self, title: &str) -> Result<bool, SessionError> {
        let (account, keys) = self.active_mut()?;
        account
            .trash_notebook(keys.derive(title))
            .ok_or_else(|| SessionError::NotebookNotFound {
                title: title.to_string(),
            })
    }

    /// Restores the most recently deleted notebook and returns its title.
    pub fn undo_notebook_delete(&mut self) -> Result<String, SessionError> {
        let (account, keys) = self.active_mut()?;
        let notebook = account.restore_notebook().ok_or(SessionError::TrashEmpty)?;
        let id = keys.derive(notebook.title());

        if account.notebooks().contains(id) {
            let title = notebook.title().to_string();
            account.return_to_trash(notebook);
            return Err(SessionError::NotebookExists { title });
        }

        let title = notebook.title().to_string();
        account.notebooks_mut().insert(id, notebook)?;
        Ok(title)
    }

    /// Sends a copy of a notebook to another account's mailbox.
    pub fn send_notebook(&self, title: &str, to_username: &str) -> Result<(), SessionError> {
        let notebook = self.open_notebook(title)?.clone();
        let target = self
            .accounts
            .get_record(&self.keys.derive(to_username))
            .ok_or_else(|| SessionError::AccountNotFound {
                username: to_username.to_string(),
            })?;

        match target.mailbox_address().send(notebook) {
            Delivery::Delivered => {
                debug!(title, to = to_username, "notebook sent");
                Ok(())
            }
            Delivery::Full(_) => Err(SessionError::MailboxFull {
                username: to_username.to_string(),
            }),
            Delivery::Closed(_) => Err(SessionError::MailboxClosed {
                username: to_username.to_string(),
            }),
        }
    }

    /// Collects newly arrived notebooks and shows the one waiting longest, if any.
    pub fn pending_import(&mut self) -> Result<Option<&Notebook>, SessionError> {
        let (account, _) = self.active_mut()?;
        let moved = account.collect_mail();
        if moved > 0 {
            debug!(moved, "mail collected");
        }
        Ok(account.inbox().peek())
    }

    /// Adds the notebook at the head of the inbox to the active account.
    ///
    /// If a notebook with the same id already exists, the import stays queued.
    pub fn accept_import(&mut self) -> Result<String, SessionError> {
        let (account, keys) = self.active_mut()?;
        let head = account.inbox().peek().ok_or(SessionError::InboxEmpty)?;
        let id = keys.derive(head.title());

        if account.notebooks().contains(id) {
            return Err(SessionError::NotebookExists {
                title: head.title().to_string(),
            });
        }

        let notebook = account.take_import().ok_or(SessionError::InboxEmpty)?;
        let title = notebook.title().to_string();
        account.notebooks_mut().insert(id, notebook)?;
        Ok(title)
    }

    /// Discards the notebook at the head of the inbox.
    pub fn reject_import(&mut self) -> Result<String, SessionError> {
        let (account, _) = self.active_mut()?;
        let notebook = account.take_import().ok_or(SessionError::InboxEmpty)?;
        Ok(notebook.title().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn logged_in(username: &str) -> Session {
        let mut session = Session::new(Config::default());
        session.register(username, "pw").unwrap();
        session.login(username, "pw").unwrap();
        session
    }

    #[test]
    fn everything_needs_a_login() {
        let mut session = Session::new(Config::default());
        assert_eq!(session.add_todo("x"), Err(SessionError::NotLoggedIn));
        assert_eq!(session.create_notebook("x"), Err(SessionError::NotLoggedIn));
        assert_eq!(session.undo_notebook_delete(), Err(SessionError::NotLoggedIn));
        assert!(matches!(session.todos(), Err(SessionError::NotLoggedIn)));
    }

    #[test]
    fn register_derives_positional_id() {
        let mut session = Session::new(Config::default());
        assert_eq!(session.register("AB", "pw"), Ok(12));
        assert_eq!(
            session.register("AB", "other"),
            Err(SessionError::UsernameTaken {
                username: "AB".to_string()
            })
        );
        assert_eq!(session.account_count(), 1);
    }

    #[test]
    fn login_checks_password() {
        let mut session = Session::new(Config::default());
        session.register("alice", "pw").unwrap();
        assert_eq!(session.login("alice", "nope"), Err(SessionError::InvalidPassword));
        assert!(!session.is_logged_in());
        assert_eq!(
            session.login("bob", "pw"),
            Err(SessionError::AccountNotFound {
                username: "bob".to_string()
            })
        );
    }

    #[test]
    fn removing_the_active_account_logs_out() {
        let mut session = logged_in("alice");
        session.remove_account("alice").unwrap();
        assert!(!session.is_logged_in());
        assert_eq!(session.account_count(), 0);
    }

    #[test]
    fn duplicate_notebook_is_reported() {
        let mut session = logged_in("alice");
        session.create_notebook("rust").unwrap();
        assert_eq!(
            session.create_notebook("rust"),
            Err(SessionError::NotebookExists {
                title: "rust".to_string()
            })
        );
    }

    #[test]
    fn undo_into_recreated_notebook_keeps_trash() {
        let mut session = logged_in("alice");
        session.create_notebook("rust").unwrap();
        session.remove_notebook("rust").unwrap();
        session.create_notebook("rust").unwrap();

        assert_eq!(
            session.undo_notebook_delete(),
            Err(SessionError::NotebookExists {
                title: "rust".to_string()
            })
        );
        assert_eq!(session.active_account().unwrap().trash().len(), 1);
    }
}
