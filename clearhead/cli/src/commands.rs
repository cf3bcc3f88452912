use crate::render;
use crate::{Commands, TutorialAction};
use anyhow::{Context, anyhow, bail};
use chrono::Local;
use clearhead_core::catalog::DEFAULT_CATEGORIES;
use clearhead_core::gesture::{self, SwipeAction, SwipeGesture};
use clearhead_core::recommend::{self, AnalysisError};
use clearhead_core::{
    Config, FileStorage, KeyValueStore, Onboarding, Priority, Task, TaskForm, TaskStore, TaskUpdate,
    ranking,
};

type Store = TaskStore<FileStorage>;

pub(crate) fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    let mut session = Session {
        config,
        storage: FileStorage::new(&config.storage.dir),
        store: None,
    };
    let result = session.execute(command);

    // Persistence problems never fail the command; they are shown like the app's banner.
    if let Some(error) = session.store.as_ref().and_then(|store| store.error()) {
        eprintln!("{error}");
    }
    result
}

struct Session<'a> {
    config: &'a Config,
    storage: FileStorage,
    store: Option<Store>,
}

impl Session<'_> {
    /// Loads the task collection on first use, so commands that never touch tasks do
    /// not report task load failures.
    fn store(&mut self) -> &mut Store {
        self.store
            .get_or_insert_with(|| TaskStore::load(self.storage.clone()))
    }

    fn execute(&mut self, command: Commands) -> anyhow::Result<()> {
        let config = self.config;
        match command {
            Commands::Add {
                title,
                description,
                priority,
                category,
            } => {
                let store = self.store();
                let mut form = TaskForm::new();
                form.title = title;
                form.description = description;
                form.priority = priority;
                form.category = category;
                submit(&mut form, store)?;
                let task = store
                    .tasks()
                    .last()
                    .context("added task is missing from the store")?;
                println!("Task added with ID {}", task.id());
            }
            Commands::Edit {
                id,
                title,
                description,
                priority,
                category,
            } => {
                let store = self.store();
                let task = find(store, &id)?.clone();
                let mut form = TaskForm::new();
                form.edit(&task);
                if let Some(title) = title {
                    form.title = title;
                }
                if let Some(description) = description {
                    form.description = description;
                }
                if let Some(priority) = priority {
                    form.priority = priority;
                }
                if let Some(category) = category {
                    form.category = Some(category);
                }
                submit(&mut form, store)?;
                println!("Task {id} updated");
            }
            Commands::List => {
                let tasks = self.store().tasks();
                let pending = ranking::pending(tasks);
                let completed = ranking::completed(tasks);
                if pending.is_empty() && completed.is_empty() {
                    println!("{}", render::EMPTY_LIST);
                }
                if !pending.is_empty() {
                    println!("Pending ({})", pending.len());
                    pending.iter().for_each(|task| println!("{}", render::task_line(task)));
                }
                if !completed.is_empty() {
                    println!("Completed ({})", completed.len());
                    completed.iter().for_each(|task| println!("{}", render::task_line(task)));
                }
            }
            Commands::Top => {
                let top = self.store().top_three();
                if top.is_empty() {
                    println!("{}", render::EMPTY_LIST);
                }
                for (index, task) in top.iter().enumerate() {
                    println!("{}. {}", index + 1, render::task_line(task));
                }
            }
            Commands::Completed => {
                for task in ranking::completed_newest_first(self.store().tasks()) {
                    println!("{}", render::task_line(task));
                }
            }
            Commands::Toggle { id } => {
                let store = self.store();
                find(store, &id)?;
                store.toggle(&id);
                println!("{}", render::completion(find(store, &id)?));
            }
            Commands::Delete { id } => {
                let store = self.store();
                find(store, &id)?;
                store.delete(&id);
                println!("Task {id} deleted");
            }
            Commands::Clear => {
                self.store().clear_all();
                println!("All tasks cleared");
            }
            Commands::Swipe { id, dx, dy } => {
                let store = self.store();
                find(store, &id)?;
                let mut swipe = SwipeGesture::new(config.gestures.swipe_threshold);
                swipe.begin();
                swipe.track(dx, dy);
                match swipe.release() {
                    Some(action) => {
                        store.apply_swipe(&id, action);
                        swipe.settle();
                        match action {
                            SwipeAction::Delete => println!("Task {id} deleted"),
                            SwipeAction::Complete => {
                                println!("{}", render::completion(find(store, &id)?))
                            }
                        }
                    }
                    None => println!("Swipe released within threshold; nothing changed"),
                }
            }
            Commands::Drag { id, dy } => {
                let store = self.store();
                let current = find(store, &id)?.priority();
                match gesture::drag_priority(current, dy, config.gestures.priority_drag_threshold) {
                    Some(priority) => {
                        store.update(&id, TaskUpdate::priority(priority))?;
                        println!("Task {id} priority: {current} -> {priority}");
                    }
                    None => println!("Drag released within threshold; nothing changed"),
                }
            }
            Commands::Recommend => {
                let tasks = self.store().tasks();
                match recommend::analyze(tasks, &Local::now()) {
                    Ok(analysis) => {
                        println!("{}", analysis.message);
                        let recommended = analysis.recommended_tasks(tasks);
                        for (rec, task) in analysis.recommendations.iter().zip(recommended) {
                            println!("{}", render::recommendation(rec, task));
                        }
                    }
                    Err(e @ AnalysisError::NoTasks) => println!("{e}"),
                }
            }
            Commands::Stats => {
                let stats = self.store().stats();
                println!("Total: {}", stats.total);
                println!("Completed: {}", stats.completed);
                println!("Pending: {}", stats.pending);
                println!("Completion rate: {}%", stats.completion_rate);
            }
            Commands::Fling { vx, vy } => {
                let surface = gesture::route_fling(vx, vy, &config.gestures);
                println!("{}", render::surface(surface));
            }
            Commands::Scroll { vy } => {
                let surface = gesture::route_scroll(vy, &config.gestures);
                println!("{}", render::surface(surface));
            }
            Commands::Categories => {
                for category in DEFAULT_CATEGORIES.iter() {
                    println!("{:<10} {}", category.name, category.color);
                }
                println!();
                for priority in Priority::ALL {
                    println!("{:<10} {}", priority, priority.color());
                }
            }
            Commands::Tutorial { action } => tutorial(action, self.storage.clone()),
        }
        Ok(())
    }
}

/// A failed write is reported but leaves the command successful; the status line then
/// reflects what is actually stored.
fn tutorial<S: KeyValueStore>(action: TutorialAction, storage: S) {
    let mut onboarding = Onboarding::load(storage);
    let saved = match action {
        TutorialAction::Status => Ok(()),
        TutorialAction::Complete => onboarding.complete(),
        TutorialAction::Reset => onboarding.reset(),
    };
    if let Err(e) = saved {
        eprintln!("{e}");
    }
    if onboarding.should_show() {
        println!("Tutorial will be shown");
    } else {
        println!("Tutorial completed");
    }
}

/// Submits the form, surfacing its warning as the command error.
fn submit(form: &mut TaskForm, store: &mut Store) -> anyhow::Result<()> {
    if form.submit(store).is_err() {
        let warning = form.warning().unwrap_or("Invalid task");
        bail!("{warning}");
    }
    Ok(())
}

fn find<'a>(store: &'a Store, id: &str) -> anyhow::Result<&'a Task> {
    store
        .get(id)
        .ok_or_else(|| anyhow!("No task with ID {id}"))
}
