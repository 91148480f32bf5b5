//! Cleaning task command implementations.

use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;
use serde::Serialize;

use super::{format_ms, open_storage, print_json, resolve_room};
use crate::cli::TaskCommands;
use crate::error::{Error, Result};
use crate::manager::{RoomTasks, TaskManager};
use crate::model::{CleaningLog, CleaningTask, TaskFrequency, TaskUpdate};
use crate::storage::SqliteStorage;
use crate::validate::normalize_frequency;

#[derive(Serialize)]
struct TaskListOutput<'a> {
    tasks: &'a [CleaningTask],
    count: usize,
    current_streak: u32,
    completed_today: usize,
}

#[derive(Serialize)]
struct DueTasksOutput<'a> {
    rooms: &'a [RoomTasks],
    count: usize,
    current_streak: u32,
    completed_today: usize,
}

#[derive(Serialize)]
struct TaskCreateOutput<'a> {
    id: i64,
    room_id: i64,
    name: &'a str,
    frequency: TaskFrequency,
}

#[derive(Serialize)]
struct CompleteOutput<'a> {
    completed: &'a [i64],
    current_streak: u32,
    completed_today: usize,
}

#[derive(Serialize)]
struct LogsOutput<'a> {
    task: &'a CleaningTask,
    logs: &'a [CleaningLog],
    count: usize,
}

#[derive(Serialize)]
struct TaskChangeOutput<'a> {
    ids: &'a [i64],
    action: &'a str,
}

/// Execute task commands.
pub fn execute(command: &TaskCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        TaskCommands::List { room, all } => list(room.as_deref(), *all, db_path, json),
        TaskCommands::Add {
            room,
            name,
            frequency,
        } => add(room, name, frequency, db_path, json),
        TaskCommands::Edit {
            id,
            name,
            frequency,
            pause,
            resume,
        } => {
            let is_active = match (pause, resume) {
                (true, _) => Some(false),
                (_, true) => Some(true),
                _ => None,
            };
            edit(*id, name.as_deref(), frequency.as_deref(), is_active, db_path, json)
        }
        TaskCommands::Complete { ids } => complete(ids, db_path, json),
        TaskCommands::Logs { id, limit } => logs(*id, *limit, db_path, json),
        TaskCommands::Delete { ids } => delete(ids, db_path, json),
    }
}

fn list(room: Option<&str>, all: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let now = Local::now();

    let mut manager = TaskManager::new();
    manager.load_due_tasks(&storage, now);
    let streak = manager.current_streak();
    let completed_today = manager.completed_today_count(&storage, now);

    if let Some(room) = room {
        let room = resolve_room(&storage, room, now)?;
        manager.load_tasks_for_room(&storage, room.id, now);
        let tasks: Vec<CleaningTask> = manager
            .all_tasks()
            .iter()
            .filter(|t| all || t.is_due_today)
            .cloned()
            .collect();
        return print_tasks(&tasks, streak, completed_today, json);
    }

    if all {
        return print_tasks(manager.all_tasks(), streak, completed_today, json);
    }

    let grouped = manager.tasks_by_room();
    if crate::is_csv() {
        return print_tasks(manager.due_tasks(), streak, completed_today, json);
    }

    if json {
        return print_json(&DueTasksOutput {
            count: manager.due_tasks().len(),
            rooms: &grouped,
            current_streak: streak,
            completed_today,
        });
    }

    if grouped.is_empty() {
        println!("Nothing due today. {}", "All clean!".green());
    } else {
        println!("Due today ({}):", manager.due_tasks().len());
        for room in &grouped {
            println!();
            println!("{}", room.room_name.bold());
            for task in &room.tasks {
                println!("  ○ [{}] {} ({})", task.id, task.name, task.frequency.label());
            }
        }
    }
    print_streak_line(streak, completed_today);
    Ok(())
}

fn print_tasks(tasks: &[CleaningTask], streak: u32, completed_today: usize, json: bool) -> Result<()> {
    if crate::is_csv() {
        println!("id,room,name,frequency,due,last_completed,streak");
        for task in tasks {
            println!(
                "{},{},{},{},{},{},{}",
                task.id,
                crate::csv_escape(&task.room_name),
                crate::csv_escape(&task.name),
                task.frequency,
                task.is_due_today,
                task.last_completed.map(format_ms).unwrap_or_default(),
                task.current_streak
            );
        }
        return Ok(());
    }

    if json {
        return print_json(&TaskListOutput {
            tasks,
            count: tasks.len(),
            current_streak: streak,
            completed_today,
        });
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!("Tasks ({}):", tasks.len());
    println!();
    for task in tasks {
        let marker = if task.is_due_today {
            "○".to_string()
        } else {
            "✓".green().to_string()
        };
        let last = task
            .last_completed
            .map_or_else(|| "never".to_string(), format_ms);
        println!(
            "{marker} [{}] {} - {} ({}, last: {last})",
            task.id,
            task.room_name,
            task.name,
            task.frequency.label()
        );
    }
    print_streak_line(streak, completed_today);
    Ok(())
}

fn print_streak_line(streak: u32, completed_today: usize) {
    println!();
    println!(
        "Streak: {} day{}  |  Completed today: {completed_today}",
        streak,
        if streak == 1 { "" } else { "s" }
    );
}

fn add(room: &str, name: &str, frequency: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("Task name cannot be empty".to_string()));
    }
    let frequency = normalize_frequency(frequency)?;

    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();
    let room = resolve_room(&storage, room, now)?;

    let id = TaskManager::new()
        .add_task(&mut storage, room.id, name, frequency, now)
        .ok_or_else(|| Error::Other(format!("Could not add task '{name}'")))?;

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        print_json(&TaskCreateOutput {
            id,
            room_id: room.id,
            name,
            frequency,
        })?;
    } else {
        println!("Added task: {name} [{id}] ({}) to {}", frequency.label(), room.name);
        if !room.is_decluttered {
            println!("  Note: tasks show up in the daily list once the room is decluttered.");
        }
    }
    Ok(())
}

fn edit(
    id: i64,
    name: Option<&str>,
    frequency: Option<&str>,
    is_active: Option<bool>,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let update = TaskUpdate {
        name: name.map(str::trim).filter(|n| !n.is_empty()).map(ToString::to_string),
        frequency: frequency.map(normalize_frequency).transpose()?,
        is_active,
    };
    if update.name.is_none() && update.frequency.is_none() && update.is_active.is_none() {
        return Err(Error::InvalidArgument(
            "Nothing to change. Pass --name, --frequency, --pause or --resume".to_string(),
        ));
    }

    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();
    find_task(&storage, id)?;

    if !TaskManager::new().update_task(&mut storage, id, &update, now) {
        return Err(Error::TaskNotFound { id });
    }

    report_tasks(&[id], "updated", json, |id| format!("Updated task {id}"))
}

fn complete(ids: &[i64], db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();

    let mut manager = TaskManager::new();
    let mut names = Vec::with_capacity(ids.len());
    for &id in ids {
        let task = find_task(&storage, id)?;
        if manager.complete_task(&mut storage, id, now).is_none() {
            return Err(Error::Other(format!("Could not log completion of task {id}")));
        }
        names.push(task.name);
    }

    let streak = manager.current_streak();
    let completed_today = manager.completed_today_count(&storage, now);

    if crate::is_silent() {
        for id in ids {
            println!("{id}");
        }
        return Ok(());
    }

    if json {
        return print_json(&CompleteOutput {
            completed: ids,
            current_streak: streak,
            completed_today,
        });
    }

    for name in &names {
        println!("{} {name}", "✓".green());
    }
    print_streak_line(streak, completed_today);
    Ok(())
}

fn logs(id: i64, limit: usize, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let task = find_task(&storage, id)?;
    let logs = storage.list_logs_for_task(id, limit)?;

    if crate::is_csv() {
        println!("id,task_id,completed_at");
        for log in &logs {
            println!("{},{},{}", log.id, log.task_id, format_ms(log.completed_at));
        }
        return Ok(());
    }

    if json {
        return print_json(&LogsOutput {
            task: &task,
            count: logs.len(),
            logs: &logs,
        });
    }

    println!(
        "{} - {} ({}, streak {})",
        task.room_name,
        task.name.bold(),
        task.frequency.label(),
        task.current_streak
    );
    println!();
    if logs.is_empty() {
        println!("  Never completed.");
    }
    for log in &logs {
        println!("  {}", format_ms(log.completed_at));
    }
    Ok(())
}

fn delete(ids: &[i64], db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();

    let mut manager = TaskManager::new();
    for &id in ids {
        if !manager.delete_task(&mut storage, id, now) {
            return Err(Error::TaskNotFound { id });
        }
    }

    report_tasks(ids, "deleted", json, |id| format!("Deleted task {id}"))
}

/// Look up a task in any active state, with its room and due status.
fn find_task(storage: &SqliteStorage, id: i64) -> Result<CleaningTask> {
    storage
        .get_task(id, Local::now())?
        .ok_or(Error::TaskNotFound { id })
}

fn report_tasks(ids: &[i64], action: &str, json: bool, describe: impl Fn(i64) -> String) -> Result<()> {
    if crate::is_silent() {
        for id in ids {
            println!("{id}");
        }
        return Ok(());
    }

    if json {
        print_json(&TaskChangeOutput { ids, action })?;
    } else {
        for &id in ids {
            println!("{}", describe(id));
        }
    }
    Ok(())
}
