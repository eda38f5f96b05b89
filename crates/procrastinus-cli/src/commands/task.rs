use chrono::NaiveDate;
use clap::Subcommand;
use procrastinus_core::storage::{load_doc, save_doc};
use procrastinus_core::{Task, TaskList};

use super::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task scheduled on the calendar
    Add {
        title: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Start hour, fractional (e.g. 9.5)
        #[arg(long)]
        start: f64,
        /// End hour, fractional
        #[arg(long)]
        end: f64,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Mark a task as done
    Complete {
        id: String,
    },
}

pub fn run(account: &str, action: TaskAction) -> CliResult {
    let ctx = Context::open(account)?;
    let mut list: TaskList = load_doc(&ctx.store, &ctx.user)?;

    match action {
        TaskAction::Add { title, date, start, end } => {
            let task = Task::new(&title, date.unwrap_or_else(|| ctx.today()), start, end)?;
            list.add(task.clone());
            save_doc(&ctx.store, &ctx.user, &list)?;
            print_json(&task)
        }
        TaskAction::List { all } => {
            let tasks: Vec<&Task> = if all {
                list.tasks.iter().collect()
            } else {
                list.pending().collect()
            };
            print_json(&tasks)
        }
        TaskAction::Complete { id } => {
            if !list.complete(&id) {
                return Err(format!("task not found: {id}").into());
            }
            save_doc(&ctx.store, &ctx.user, &list)?;
            println!("ok");
            Ok(())
        }
    }
}
