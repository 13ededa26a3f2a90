use tracing::{debug, info};

use crate::buffer::{Overflow, Push, Queue, Stack};
use crate::bst::BinarySearchTree;
use crate::config::Config;
use crate::error::SessionError;
use crate::graph::{DirectedGraph, Vertex};
use crate::hash_table::Keyed;
use crate::mailbox::{Mailbox, MailboxAddress};
use crate::notebook::Notebook;

/// A user together with everything the user owns.
///
/// Nothing outside the account mutates its containers. Other accounts reach it only
/// through the address of its mailbox.
#[derive(Debug)]
pub struct Account {
    id: u32,
    username: String,
    password: blake3::Hash,
    todos: DirectedGraph<String>,
    /// Highest todo id handed out so far.
    todo_id_count: u32,
    notebooks: BinarySearchTree<Notebook>,
    inbox: Queue<Notebook>,
    trash: Stack<Notebook>,
    mailbox: Mailbox<Notebook>,
}

impl Keyed for Account {
    type Key = u32;

    fn key(&self) -> &u32 {
        &self.id
    }
}

impl Account {
    pub fn new(id: u32, username: impl Into<String>, password: &str, config: &Config) -> Self {
        Self {
            id,
            username: username.into(),
            password: blake3::hash(password.as_bytes()),
            todos: DirectedGraph::new(),
            todo_id_count: 0,
            notebooks: BinarySearchTree::new(),
            inbox: Queue::new(config.inbox.capacity, config.inbox.overflow),
            trash: Stack::new(config.trash.capacity, config.trash.overflow),
            mailbox: Mailbox::new(config.mailbox.capacity),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn validate_password(&self, password: &str) -> bool {
        blake3::hash(password.as_bytes()) == self.password
    }

    pub fn todos(&self) -> &DirectedGraph<String> {
        &self.todos
    }

    pub fn todos_mut(&mut self) -> &mut DirectedGraph<String> {
        &mut self.todos
    }

    pub fn notebooks(&self) -> &BinarySearchTree<Notebook> {
        &self.notebooks
    }

    pub fn notebooks_mut(&mut self) -> &mut BinarySearchTree<Notebook> {
        &mut self.notebooks
    }

    pub fn inbox(&self) -> &Queue<Notebook> {
        &self.inbox
    }

    pub fn trash(&self) -> &Stack<Notebook> {
        &self.trash
    }

    pub fn mailbox_address(&self) -> MailboxAddress<Notebook> {
        self.mailbox.address()
    }

    /// Adds a todo under the next free id and returns that id.
    pub fn add_todo(&mut self, todo: &str) -> Result<u32, SessionError> {
        if self.todos.iter().any(|vertex| vertex.data() == todo) {
            return Err(SessionError::DuplicateTodo {
                todo: todo.to_string(),
            });
        }

        let id = self.todo_id_count + 1;
        self.todos.add_vertex(id, todo.to_string())?;
        self.todo_id_count = id;
        debug!(account = self.id, todo = id, "todo added");
        Ok(id)
    }

    /// Records that `dependent` cannot be done before `todo`.
    pub fn add_dependent(&mut self, todo: u32, dependent: u32) -> Result<(), SessionError> {
        let vertex = self
            .todos
            .search_by_id(dependent)
            .ok_or(SessionError::TodoNotFound { id: dependent })?;
        if vertex.search_edge_by_id(todo) {
            return Ok(());
        }
        self.todos.add_edge_by_id(dependent, todo)?;
        Ok(())
    }

    /// Todos that could still be declared as depending on `todo`.
    pub fn dependent_candidates(&self, todo: u32) -> impl Iterator<Item = &Vertex<String>> {
        self.todos
            .iter()
            .filter(move |vertex| vertex.id() != todo && !vertex.search_edge_by_id(todo))
    }

    pub fn remove_todo(&mut self, id: u32) -> Result<String, SessionError> {
        self.todos
            .delete_vertex_by_id(id)
            .ok_or(SessionError::TodoNotFound { id })
    }

    /// Deletes a notebook and keeps it in the trash for undo.
    ///
    /// Returns `None` if there is no such notebook, otherwise whether it can be restored.
    pub fn trash_notebook(&mut self, id: u32) -> Option<bool> {
        let notebook = self.notebooks.delete_node(id)?;
        match self.trash.push(notebook) {
            Push::Accepted => Some(true),
            Push::Evicted(forgotten) => {
                info!(title = forgotten.title(), "oldest deleted notebook forgotten");
                Some(true)
            }
            Push::Rejected(lost) => {
                info!(title = lost.title(), "trash full, notebook deleted for good");
                Some(false)
            }
        }
    }

    /// Takes the most recently trashed notebook back out of the trash.
    pub fn restore_notebook(&mut self) -> Option<Notebook> {
        self.trash.pop()
    }

    /// Puts a notebook back on top of the trash after a failed restore.
    pub fn return_to_trash(&mut self, notebook: Notebook) {
        if let Push::Rejected(lost) = self.trash.push(notebook) {
            info!(title = lost.title(), "trash full, notebook deleted for good");
        }
    }

    /// Moves everything that arrived in the mailbox into the inbox, as far as room allows.
    /// Returns how many notebooks were moved.
    pub fn collect_mail(&mut self) -> usize {
        let mut moved = 0;
        while !(self.inbox.is_full() && self.inbox.overflow() == Overflow::Reject) {
            let Some(notebook) = self.mailbox.poll() else {
                break;
            };
            match self.inbox.enqueue(notebook) {
                Push::Accepted => {}
                Push::Evicted(dropped) => {
                    info!(title = dropped.title(), "inbox full, oldest import dropped")
                }
                Push::Rejected(_) => unreachable!("a full rejecting inbox is never offered mail"),
            }
            moved += 1;
        }
        moved
    }

    pub fn take_import(&mut self) -> Option<Notebook> {
        self.inbox.dequeue()
    }
}
