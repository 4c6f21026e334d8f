use clap::Subcommand;

use super::{with_state, CliResult};

#[derive(Subcommand)]
pub enum TodoAction {
    /// Show every list
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a task to a list (homework, chores, "fun stuff")
    Add {
        list: String,
        text: String,
    },
    /// Mark a task done or not done
    Toggle {
        list: String,
        id: String,
    },
}

pub fn run(action: TodoAction) -> CliResult {
    with_state(|state, _, _| {
        let todos = &mut state.session.todos;
        match action {
            TodoAction::List { json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(todos.lists())?);
                    return Ok(());
                }
                for list in todos.lists() {
                    println!("{}", list.title);
                    for task in &list.tasks {
                        let check = if task.completed { "x" } else { " " };
                        println!("  [{check}] {:<36} {}", task.id, task.text);
                    }
                }
            }
            TodoAction::Add { list, text } => match todos.add(&list, &text)? {
                Some(item) => println!("added {} ({})", item.text, item.id),
                None => println!("nothing to add"),
            },
            TodoAction::Toggle { list, id } => {
                let done = todos.toggle(&list, &id)?;
                println!("{id} is {}", if done { "done" } else { "not done" });
            }
        }
        Ok(())
    })
}
