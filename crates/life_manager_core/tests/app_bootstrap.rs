use life_manager_core::{AppConfig, BootstrapError, LifeManager, TaskQuery};

#[test]
fn bootstrap_initializes_database_and_wires_services() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        db_path: dir.path().join("data").join("life.db"),
        ..AppConfig::default()
    };

    let mut app = LifeManager::bootstrap(config).unwrap();
    assert!(app.config.db_path.exists());
    assert!(!app.session.is_authenticated());

    app.auth.register("alice", "secret1").unwrap();
    let user = app
        .auth
        .login(&mut app.session, "alice", "secret1")
        .unwrap();
    let user_id = user.id.unwrap();

    app.tasks.create_task(user_id, "Plan week", None, "urgent").unwrap();
    assert_eq!(
        app.tasks
            .get_user_tasks(user_id, &TaskQuery::default())
            .unwrap()
            .len(),
        1
    );
    assert!(app.habits.get_user_habits(user_id).unwrap().is_empty());
    assert!(app.library.get_user_books(user_id).unwrap().is_empty());
    assert_eq!(app.suggestions.generator().model(), "llama2");
}

#[test]
fn bootstrap_fails_when_database_cannot_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"file").unwrap();

    let config = AppConfig {
        db_path: blocker.join("life.db"),
        ..AppConfig::default()
    };
    assert!(matches!(
        LifeManager::bootstrap(config),
        Err(BootstrapError::Database(_))
    ));
}
