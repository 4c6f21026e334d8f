//! Simple to-do lists: Homework, Chores and Fun Stuff.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoList {
    pub title: String,
    pub tasks: Vec<TodoItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoBoard {
    lists: Vec<TodoList>,
}

fn item(id: &str, text: &str, completed: bool) -> TodoItem {
    TodoItem {
        id: id.to_string(),
        text: text.to_string(),
        completed,
    }
}

impl Default for TodoBoard {
    fn default() -> Self {
        Self {
            lists: vec![
                TodoList {
                    title: "Homework".into(),
                    tasks: vec![
                        item("h1", "Math worksheet pages 5-7", false),
                        item("h2", "Read \"The Giver\" Chapter 4", true),
                        item("h3", "Study for Science vocabulary quiz", false),
                    ],
                },
                TodoList {
                    title: "Chores".into(),
                    tasks: vec![
                        item("c1", "Clean my room", false),
                        item("c2", "Take out the trash", false),
                        item("c3", "Feed the dog", true),
                    ],
                },
                TodoList {
                    title: "Fun Stuff".into(),
                    tasks: vec![
                        item("f1", "Finish drawing my comic book", false),
                        item("f2", "Practice my new skateboard trick", false),
                    ],
                },
            ],
        }
    }
}

impl TodoBoard {
    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    /// List lookup is case-insensitive so the CLI can say `homework`.
    fn list_mut(&mut self, title: &str) -> Result<&mut TodoList, ValidationError> {
        self.lists
            .iter_mut()
            .find(|l| l.title.eq_ignore_ascii_case(title))
            .ok_or_else(|| ValidationError::UnknownList(title.to_string()))
    }

    /// Flip an item's completion; returns the new state.
    pub fn toggle(&mut self, list: &str, id: &str) -> Result<bool, ValidationError> {
        let todo = self.list_mut(list)?;
        let title = todo.title.clone();
        let task = todo
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ValidationError::UnknownItem { list: title, id: id.to_string() })?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    /// Append a task. Blank text is ignored and yields `None`.
    pub fn add(&mut self, list: &str, text: &str) -> Result<Option<TodoItem>, ValidationError> {
        let todo = self.list_mut(list)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let prefix = todo
            .title
            .chars()
            .next()
            .map(|c| c.to_ascii_lowercase())
            .unwrap_or('t');
        let new = TodoItem {
            id: format!("{prefix}{}", uuid::Uuid::new_v4().simple()),
            text: text.to_string(),
            completed: false,
        };
        todo.tasks.push(new.clone());
        Ok(Some(new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_completion() {
        let mut board = TodoBoard::default();
        assert!(board.toggle("Homework", "h1").unwrap());
        assert!(!board.toggle("homework", "h1").unwrap());
    }

    #[test]
    fn unknown_list_and_item() {
        let mut board = TodoBoard::default();
        assert_eq!(
            board.toggle("Errands", "x").unwrap_err(),
            ValidationError::UnknownList("Errands".into())
        );
        assert!(matches!(
            board.toggle("Chores", "x").unwrap_err(),
            ValidationError::UnknownItem { .. }
        ));
    }

    #[test]
    fn add_ignores_blank_and_prefixes_ids() {
        let mut board = TodoBoard::default();
        assert!(board.add("Chores", "   ").unwrap().is_none());
        let added = board.add("Chores", "Water the plants").unwrap().unwrap();
        assert!(added.id.starts_with('c'));
        assert_eq!(board.lists()[1].tasks.len(), 4);
    }
}
