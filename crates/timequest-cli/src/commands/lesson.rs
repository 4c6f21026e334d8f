use clap::Subcommand;
use timequest_core::CATALOG;

use super::CliResult;

#[derive(Subcommand)]
pub enum LessonAction {
    /// List every lesson
    List {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: LessonAction) -> CliResult {
    match action {
        LessonAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&CATALOG)?);
                return Ok(());
            }
            for lesson in &CATALOG {
                println!("{:<28} {}", lesson.id.slug(), lesson.title);
                println!("{:<28} {}", "", lesson.description);
            }
        }
    }
    Ok(())
}
