use clap::Subcommand;
use rituals_core::format::format_duration;
use rituals_core::{Config, JsonStore};

#[derive(Subcommand)]
pub enum DataAction {
    /// Show launched rituals
    Show {
        /// Output the whole saved document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the path of the saved document
    Path,
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = JsonStore::open(&config)?;

    match action {
        DataAction::Show { json } => {
            let saved = store.load_saved()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&saved)?);
                return Ok(());
            }
            if saved.instances().next().is_none() {
                println!("No launched rituals yet.");
                return Ok(());
            }
            for (id, instance) in saved.instances() {
                let status = serde_json::to_value(instance.status)?;
                println!(
                    "{:<24} {:<16} {:<10} {} / {}  paused {}",
                    id,
                    instance.name,
                    status.as_str().unwrap_or_default(),
                    format_duration(instance.time.actual as i64),
                    format_duration(instance.time.expected as i64),
                    format_duration(instance.time.paused as i64),
                );
            }
        }
        DataAction::Path => println!("{}", store.data_path().display()),
    }
    Ok(())
}
