use chrono::{Datelike, Weekday};
use life_manager_core::db::open_connection;
use life_manager_core::{
    AuthService, CalendarDay, CalendarError, CalendarService, Database, Frequency, HabitService,
    TaskService, TaskStatus,
};
use std::path::Path;

fn set_created_at(path: &Path, id: i64, value: &str) {
    let conn = open_connection(path).unwrap();
    conn.execute(
        "UPDATE tasks SET created_at = ?1 WHERE id = ?2;",
        rusqlite::params![value, id],
    )
    .unwrap();
}

fn task_titles(day: &CalendarDay) -> Vec<&str> {
    day.tasks.iter().map(|task| task.title.as_str()).collect()
}

fn habit_names(day: &CalendarDay) -> Vec<&str> {
    day.habits.iter().map(|habit| habit.name.as_str()).collect()
}

#[test]
fn month_places_open_tasks_and_habits_by_frequency() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("life.db");
    Database::new(&path).initialize().unwrap();
    let user_id = AuthService::new(Database::new(&path))
        .register("alice", "secret1")
        .unwrap()
        .id
        .unwrap();
    let tasks = TaskService::new(Database::new(&path));
    let habits = HabitService::new(Database::new(&path));

    let open = tasks.create_task(user_id, "open task", None, "simple").unwrap();
    let done = tasks.create_task(user_id, "done task", None, "urgent").unwrap();
    set_created_at(&path, open.id.unwrap(), "2024-04-10 09:00:00");
    set_created_at(&path, done.id.unwrap(), "2024-04-10 11:00:00");
    tasks
        .update_task_status(done.id.unwrap(), TaskStatus::Completed)
        .unwrap();

    habits
        .create_habit(user_id, "Water", Frequency::Daily, None)
        .unwrap();
    habits
        .create_habit(user_id, "Review week", Frequency::Weekly, None)
        .unwrap();
    habits
        .create_habit(user_id, "Budget", Frequency::Monthly, None)
        .unwrap();

    let calendar = CalendarService::new(Database::new(&path));
    let april = calendar.calendar_month(user_id, 2024, 4).unwrap();
    assert_eq!(april.len(), 30);
    assert_eq!(april[0].date.day(), 1);

    // 2024-04-01 is a Monday and the first of the month.
    assert_eq!(habit_names(&april[0]), vec!["Water", "Review week", "Budget"]);
    assert_eq!(habit_names(&april[1]), vec!["Water"]);
    assert_eq!(habit_names(&april[7]), vec!["Water", "Review week"]);
    for day in &april {
        let weekly = habit_names(day).contains(&"Review week");
        assert_eq!(weekly, day.date.weekday() == Weekday::Mon);
    }

    assert_eq!(task_titles(&april[9]), vec!["open task"]);
    assert!(april
        .iter()
        .flat_map(|day| day.tasks.iter())
        .all(|task| task.status != TaskStatus::Completed));
    assert_eq!(
        april.iter().map(|day| day.tasks.len()).sum::<usize>(),
        1
    );
}

#[test]
fn invalid_month_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("life.db");
    Database::new(&path).initialize().unwrap();
    let calendar = CalendarService::new(Database::new(&path));

    assert!(matches!(
        calendar.calendar_month(1, 2024, 0),
        Err(CalendarError::InvalidMonth { month: 0, .. })
    ));
    assert!(matches!(
        calendar.calendar_month(1, 2024, 13),
        Err(CalendarError::InvalidMonth { month: 13, .. })
    ));
}
