//! Daily spark commands for CLI.
//!
//! The task list is not persisted, so every command refreshes first.

use clap::Subcommand;
use socialspark_core::{Config, SparkScheduler};

#[derive(Subcommand)]
pub enum SparksAction {
    /// Fetch and show today's sparks
    List {
        /// Number of sparks to request (default: sparks.daily_count)
        #[arg(long)]
        count: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a spark as done
    Complete {
        /// Task ID (shown by `sparks list`)
        id: String,
        /// Number of sparks to request (default: sparks.daily_count)
        #[arg(long)]
        count: Option<usize>,
    },
}

pub fn run(action: SparksAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let scheduler = SparkScheduler::new(super::gateway(&config)?, config.user.id.clone());
    let rt = super::runtime()?;
    let default_count = config.sparks.daily_count as usize;

    match action {
        SparksAction::List { count, json } => {
            rt.block_on(scheduler.refresh(count.unwrap_or(default_count)))?;
            let tasks = scheduler.tasks();
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No sparks today.");
            } else {
                for task in &tasks {
                    let check = if task.is_completed { "x" } else { " " };
                    println!("[{check}] {:>5}  {}", task.id, task.name);
                }
            }
        }
        SparksAction::Complete { id, count } => {
            rt.block_on(async {
                scheduler.refresh(count.unwrap_or(default_count)).await?;
                scheduler.complete(&id).await
            })?;
            println!("Spark completed: {id}");
        }
    }
    Ok(())
}
