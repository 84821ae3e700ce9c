use chrono::NaiveTime;
use life_manager_core::{
    AuthService, Database, Frequency, HabitService, HabitServiceError, Subscriber,
};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

type Log = Rc<RefCell<Vec<String>>>;

fn setup(path: &Path) -> (HabitService, i64) {
    Database::new(path).initialize().unwrap();
    let user = AuthService::new(Database::new(path))
        .register("alice", "secret1")
        .unwrap();
    (HabitService::new(Database::new(path)), user.id.unwrap())
}

fn recorder(log: &Log, label: &'static str) -> Arc<dyn Subscriber<String>> {
    let log = Rc::clone(log);
    Arc::new(move |message: &String| log.borrow_mut().push(format!("{label}:{message}")))
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[test]
fn create_and_list_habits_with_optional_reminder() {
    let dir = tempfile::tempdir().unwrap();
    let (habits, user_id) = setup(&dir.path().join("life.db"));

    let stretch = habits
        .create_habit(user_id, " Stretch ", Frequency::Daily, Some("07:30"))
        .unwrap();
    let journal = habits
        .create_habit(user_id, "Journal", Frequency::Weekly, Some(""))
        .unwrap();

    assert_eq!(stretch.name, "Stretch");
    assert_eq!(journal.reminder_time, None);
    assert_eq!(
        habits.get_habit(stretch.id.unwrap()).unwrap().as_ref(),
        Some(&stretch)
    );
    assert_eq!(habits.get_user_habits(user_id).unwrap(), vec![stretch, journal]);
}

#[test]
fn invalid_input_is_rejected_before_storage() {
    let dir = tempfile::tempdir().unwrap();
    let (habits, user_id) = setup(&dir.path().join("life.db"));

    assert!(matches!(
        habits.create_habit(user_id, "  ", Frequency::Daily, None),
        Err(HabitServiceError::EmptyName)
    ));
    assert!(matches!(
        habits.create_habit(user_id, "Run", Frequency::Daily, Some("25:00")),
        Err(HabitServiceError::InvalidReminderTime(_))
    ));
    assert!(habits.get_user_habits(user_id).unwrap().is_empty());
}

#[test]
fn update_and_delete_habit() {
    let dir = tempfile::tempdir().unwrap();
    let (habits, user_id) = setup(&dir.path().join("life.db"));
    let mut habit = habits
        .create_habit(user_id, "Read", Frequency::Daily, None)
        .unwrap();
    let id = habit.id.unwrap();

    habit.frequency = Frequency::Monthly;
    habit.reminder_time = Some("21:00".to_string());
    habits.update_habit(&habit).unwrap();
    let stored = habits.get_habit(id).unwrap().unwrap();
    assert_eq!(stored.frequency, Frequency::Monthly);
    assert_eq!(stored.reminder_time.as_deref(), Some("21:00"));

    habit.reminder_time = Some("9pm".to_string());
    assert!(matches!(
        habits.update_habit(&habit),
        Err(HabitServiceError::InvalidReminderTime(_))
    ));

    habits.delete_habit(id).unwrap();
    assert!(habits.get_habit(id).unwrap().is_none());
    assert!(matches!(
        habits.delete_habit(id),
        Err(HabitServiceError::HabitNotFound(missing)) if missing == id
    ));
}

#[test]
fn reminder_check_notifies_every_subscriber_in_attachment_order() {
    let dir = tempfile::tempdir().unwrap();
    let (mut habits, user_id) = setup(&dir.path().join("life.db"));
    habits
        .create_habit(user_id, "Stretch", Frequency::Daily, Some("07:30"))
        .unwrap();
    habits
        .create_habit(user_id, "Water", Frequency::Daily, Some("07:30"))
        .unwrap();
    habits
        .create_habit(user_id, "Sleep", Frequency::Daily, Some("22:00"))
        .unwrap();

    let log: Log = Rc::default();
    let first = recorder(&log, "first");
    let second = recorder(&log, "second");
    assert!(habits.notifications_mut().attach(Arc::clone(&first)));
    assert!(habits.notifications_mut().attach(second));
    assert!(!habits.notifications_mut().attach(first));

    let published = habits.check_reminders_at(at(7, 30)).unwrap();
    assert_eq!(published, 2);
    assert_eq!(
        *log.borrow(),
        vec![
            "first:Reminder: time to do habit 'Stretch'",
            "second:Reminder: time to do habit 'Stretch'",
            "first:Reminder: time to do habit 'Water'",
            "second:Reminder: time to do habit 'Water'",
        ]
    );
    assert_eq!(
        habits.notifications().history(),
        [
            "Reminder: time to do habit 'Stretch'".to_string(),
            "Reminder: time to do habit 'Water'".to_string(),
        ]
    );
}

#[test]
fn reminder_check_repeats_within_the_same_minute_and_ignores_other_times() {
    let dir = tempfile::tempdir().unwrap();
    let (mut habits, user_id) = setup(&dir.path().join("life.db"));
    habits
        .create_habit(user_id, "Meditate", Frequency::Daily, Some("06:05"))
        .unwrap();
    habits
        .create_habit(user_id, "No alarm", Frequency::Daily, None)
        .unwrap();

    assert_eq!(habits.check_reminders_at(at(6, 4)).unwrap(), 0);
    assert_eq!(habits.check_reminders_at(at(6, 5)).unwrap(), 1);
    assert_eq!(
        habits
            .check_reminders_at(NaiveTime::from_hms_opt(6, 5, 59).unwrap())
            .unwrap(),
        1
    );
    assert_eq!(habits.notifications().history().len(), 2);
}

#[test]
fn reminders_cover_every_owner_and_detached_subscribers_stay_silent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("life.db");
    let (mut habits, alice) = setup(&path);
    let bob = AuthService::new(Database::new(&path))
        .register("bobby", "secret2")
        .unwrap()
        .id
        .unwrap();
    habits
        .create_habit(alice, "Walk", Frequency::Daily, Some("12:00"))
        .unwrap();
    habits
        .create_habit(bob, "Lunch", Frequency::Daily, Some("12:00"))
        .unwrap();

    let log: Log = Rc::default();
    let subscriber = recorder(&log, "s");
    habits.notifications_mut().attach(Arc::clone(&subscriber));
    assert!(habits.notifications_mut().detach(&subscriber));

    assert_eq!(habits.check_reminders_at(at(12, 0)).unwrap(), 2);
    assert!(log.borrow().is_empty());
    assert_eq!(habits.notifications().subscriber_count(), 0);
}
