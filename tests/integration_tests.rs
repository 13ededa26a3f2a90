use indoc::indoc;
use pretty_assertions::assert_eq;
use programmers_notes::{Config, Session, SessionError, TodoDetails};

fn logged_in_with(config: Config, usernames: &[&str]) -> Session {
    let mut session = Session::new(config);
    for username in usernames {
        session.register(username, "secret").unwrap();
    }
    session.login(usernames[0], "secret").unwrap();
    session
}

fn logged_in(usernames: &[&str]) -> Session {
    logged_in_with(Config::default(), usernames)
}

fn todo_ids(session: &Session) -> Vec<u32> {
    session.todos().unwrap().iter().map(|v| v.id()).collect()
}

#[test]
fn dinner_waits_for_milk() {
    let mut session = logged_in(&["alice"]);
    let milk = session.add_todo("Buy milk").unwrap();
    let dinner = session.add_todo("Cook dinner").unwrap();
    session.add_dependent(milk, dinner).unwrap();

    assert_eq!(session.what_to_do().unwrap(), vec!["Buy milk"]);
    assert_eq!(
        session.todo_details(dinner).unwrap(),
        TodoDetails {
            id: dinner,
            todo: "Cook dinner".to_string(),
            depends_on: vec![(milk, "Buy milk".to_string())],
        }
    );

    session.remove_todo(milk).unwrap();
    assert_eq!(session.what_to_do().unwrap(), vec!["Cook dinner"]);
    assert!(session.todo_details(dinner).unwrap().depends_on.is_empty());
}

#[test]
fn sorting_reorders_the_todo_list() {
    let mut session = logged_in(&["alice"]);
    for todo in ["a", "b", "c", "d"] {
        session.add_todo(todo).unwrap();
    }
    // 1 depends on 2 and 3, 2 depends on 3.
    session.add_dependent(2, 1).unwrap();
    session.add_dependent(3, 1).unwrap();
    session.add_dependent(3, 2).unwrap();

    session.sort_todos_by_doability().unwrap();
    assert_eq!(todo_ids(&session), vec![3, 4, 2, 1]);

    session.sort_todos_by_id().unwrap();
    assert_eq!(todo_ids(&session), vec![1, 2, 3, 4]);

    assert_eq!(session.what_to_do().unwrap(), vec!["c", "d"]);
}

#[test]
fn todo_ids_keep_counting_after_removal() {
    let mut session = logged_in(&["alice"]);
    session.add_todo("a").unwrap();
    session.add_todo("b").unwrap();
    session.remove_todo(2).unwrap();

    assert_eq!(session.add_todo("c"), Ok(3));
    assert_eq!(
        session.add_todo("a"),
        Err(SessionError::DuplicateTodo {
            todo: "a".to_string()
        })
    );
    assert_eq!(session.remove_todo(2), Err(SessionError::TodoNotFound { id: 2 }));
}

#[test]
fn notebooks_are_listed_in_id_order() {
    let mut session = logged_in(&["alice"]);
    // Single capital letters map to their alphabet position.
    for title in ["E", "C", "H", "A", "D"] {
        session.create_notebook(title).unwrap();
    }

    assert_eq!(session.notebook_titles().unwrap(), vec!["A", "C", "D", "E", "H"]);

    session.remove_notebook("C").unwrap();
    assert_eq!(session.notebook_titles().unwrap(), vec!["A", "D", "E", "H"]);
}

#[test]
fn removed_notebooks_come_back_newest_first() {
    let mut session = logged_in(&["alice"]);
    session.create_notebook("Rust").unwrap();
    session.add_note("Rust", "ownership").unwrap();
    session.create_notebook("Go").unwrap();

    session.remove_notebook("Rust").unwrap();
    session.remove_notebook("Go").unwrap();
    assert_eq!(session.notebook_titles().unwrap(), Vec::<&str>::new());

    assert_eq!(session.undo_notebook_delete(), Ok("Go".to_string()));
    assert_eq!(session.undo_notebook_delete(), Ok("Rust".to_string()));
    assert_eq!(session.undo_notebook_delete(), Err(SessionError::TrashEmpty));

    assert_eq!(
        session.open_notebook("Rust").unwrap().content(),
        ["ownership".to_string()]
    );
}

#[test]
fn notebooks_travel_between_accounts() {
    let mut session = logged_in(&["alice", "bob"]);
    session.create_notebook("Rust").unwrap();
    session.add_note("Rust", "borrowing").unwrap();
    session.create_notebook("Go").unwrap();
    session.send_notebook("Rust", "bob").unwrap();
    session.send_notebook("Go", "bob").unwrap();

    session.logout();
    session.login("bob", "secret").unwrap();

    assert_eq!(
        session.pending_import().unwrap().map(|n| n.title().to_string()),
        Some("Rust".to_string())
    );
    assert_eq!(session.accept_import(), Ok("Rust".to_string()));
    assert_eq!(session.reject_import(), Ok("Go".to_string()));
    assert_eq!(session.pending_import().unwrap(), None);
    assert_eq!(session.accept_import(), Err(SessionError::InboxEmpty));

    assert_eq!(session.notebook_titles().unwrap(), vec!["Rust"]);
    assert_eq!(
        session.open_notebook("Rust").unwrap().content(),
        ["borrowing".to_string()]
    );
}

#[test]
fn sending_to_a_missing_account_fails() {
    let mut session = logged_in(&["alice"]);
    session.create_notebook("Rust").unwrap();

    assert_eq!(
        session.send_notebook("Rust", "nobody"),
        Err(SessionError::AccountNotFound {
            username: "nobody".to_string()
        })
    );
    assert_eq!(
        session.send_notebook("Go", "alice"),
        Err(SessionError::NotebookNotFound {
            title: "Go".to_string()
        })
    );
}

#[test]
fn full_mailbox_refuses_more_notebooks() {
    let config = Config::from_toml(indoc! {r#"
        [mailbox]
        capacity = 1
    "#})
    .unwrap();
    let mut session = logged_in_with(config, &["alice", "bob"]);
    session.create_notebook("Rust").unwrap();

    session.send_notebook("Rust", "bob").unwrap();
    assert_eq!(
        session.send_notebook("Rust", "bob"),
        Err(SessionError::MailboxFull {
            username: "bob".to_string()
        })
    );
}

#[test]
fn accounts_are_looked_up_by_username() {
    let mut session = Session::new(Config::default());
    session.register("alice", "secret").unwrap();
    session.register("bob", "hunter2").unwrap();
    assert_eq!(session.account_count(), 2);

    assert_eq!(
        session.register("alice", "other"),
        Err(SessionError::UsernameTaken {
            username: "alice".to_string()
        })
    );
    assert_eq!(
        session.login("bob", "secret"),
        Err(SessionError::InvalidPassword)
    );

    session.login("bob", "hunter2").unwrap();
    assert_eq!(session.active_account().unwrap().username(), "bob");

    session.remove_account("bob").unwrap();
    assert!(!session.is_logged_in());
    assert_eq!(session.account_count(), 1);
    assert_eq!(
        session.login("bob", "hunter2"),
        Err(SessionError::AccountNotFound {
            username: "bob".to_string()
        })
    );
}

#[test]
fn fnv_keys_tell_apart_positional_collisions() {
    let config = Config::from_toml(indoc! {r#"
        [accounts]
        key_strategy = "fnv1a"
    "#})
    .unwrap();
    let mut session = Session::new(config);

    // "AK" and "BA" share a positional key.
    session.register("AK", "x").unwrap();
    session.register("BA", "y").unwrap();
    assert_eq!(session.account_count(), 2);

    let mut positional = Session::new(Config::default());
    positional.register("AK", "x").unwrap();
    assert!(matches!(
        positional.register("BA", "y"),
        Err(SessionError::UsernameTaken { .. })
    ));
}

fn with_trash(source: &str) -> Session {
    logged_in_with(Config::from_toml(source).unwrap(), &["alice"])
}

#[test]
fn evicting_trash_forgets_the_oldest_removal() {
    let mut session = with_trash(indoc! {r#"
        [trash]
        capacity = 1
        overflow = "evict"
    "#});
    session.create_notebook("A").unwrap();
    session.create_notebook("B").unwrap();

    assert_eq!(session.remove_notebook("A"), Ok(true));
    assert_eq!(session.remove_notebook("B"), Ok(true));

    assert_eq!(session.undo_notebook_delete(), Ok("B".to_string()));
    assert_eq!(session.undo_notebook_delete(), Err(SessionError::TrashEmpty));
    assert_eq!(session.notebook_titles().unwrap(), vec!["B"]);
}

#[test]
fn rejecting_trash_deletes_for_good() {
    let mut session = with_trash(indoc! {r#"
        [trash]
        capacity = 1
        overflow = "reject"
    "#});
    session.create_notebook("A").unwrap();
    session.create_notebook("B").unwrap();

    assert_eq!(session.remove_notebook("A"), Ok(true));
    assert_eq!(session.remove_notebook("B"), Ok(false));

    assert_eq!(session.undo_notebook_delete(), Ok("A".to_string()));
    assert_eq!(session.undo_notebook_delete(), Err(SessionError::TrashEmpty));
    assert_eq!(
        session.open_notebook("B"),
        Err(SessionError::NotebookNotFound {
            title: "B".to_string()
        })
    );
}

#[test]
fn partial_trash_section_still_evicts() {
    let mut session = with_trash(indoc! {r#"
        [trash]
        capacity = 1
    "#});
    session.create_notebook("A").unwrap();
    session.create_notebook("B").unwrap();

    assert_eq!(session.remove_notebook("A"), Ok(true));
    assert_eq!(session.remove_notebook("B"), Ok(true));
    assert_eq!(session.undo_notebook_delete(), Ok("B".to_string()));
}
