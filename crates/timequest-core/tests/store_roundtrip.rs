//! On-disk store: values survive closing and reopening the database file.

use chrono::NaiveDate;
use tempfile::TempDir;
use timequest_core::lessons::TimeBlocking;
use timequest_core::{CoinBalance, Database};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 5, d).unwrap()
}

#[test]
fn kv_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timequest.db");
    {
        let db = Database::open_at(&path).unwrap();
        db.kv_set("greeting", "hello").unwrap();
        db.kv_set("greeting", "hi").unwrap();
        db.set_json("numbers", &vec![1, 2, 3]).unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.kv_get("greeting").unwrap().as_deref(), Some("hi"));
    assert_eq!(db.get_json::<Vec<i32>>("numbers").unwrap(), Some(vec![1, 2, 3]));
    assert!(db.kv_delete("greeting").unwrap());
    assert!(!db.kv_delete("greeting").unwrap());
    assert_eq!(db.kv_get("greeting").unwrap(), None);
}

#[test]
fn time_blocking_boards_are_kept_per_date() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timequest.db");
    let mut coins = CoinBalance::new();

    {
        let db = Database::open_at(&path).unwrap();
        let mut lesson = TimeBlocking::new(20, 5);
        lesson.drop_task("t1", 4, &mut coins).unwrap();
        lesson.save(&db, day(1)).unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let mut lesson = TimeBlocking::new(20, 5);
    lesson.load(&db, day(1)).unwrap();
    assert_eq!(lesson.board().grid().position_of("t1"), Some((0, 4)));
    assert_eq!(lesson.board().pool().len(), 4);

    lesson.load(&db, day(2)).unwrap();
    assert_eq!(lesson.board().grid().position_of("t1"), None);
    assert_eq!(lesson.board().pool().len(), 5);
    assert!(db.kv_get("tasks-2030-05-01").unwrap().is_some());
    assert!(db.kv_get("sched-2030-05-02").unwrap().is_none());
}
