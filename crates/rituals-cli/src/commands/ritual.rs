use clap::Subcommand;
use rituals_core::format::format_duration;
use rituals_core::{expand, validate_catalog, Config, JsonStore, RitualStore};
use serde::Serialize;

#[derive(Subcommand)]
pub enum RitualAction {
    /// List ritual templates
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the flattened acts of a ritual
    Show {
        /// Template id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check every template for missing or cyclic references
    Validate,
    /// Write a starter rituals.json
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct RitualSummary {
    id: String,
    name: String,
    acts: usize,
    expected_secs: u64,
}

pub fn run(action: RitualAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = JsonStore::open(&config)?;

    match action {
        RitualAction::List { json } => {
            let catalog = store.load()?;
            let mut summaries = Vec::new();
            for (id, template) in catalog.templates() {
                let acts = expand(id, &catalog)?;
                summaries.push(RitualSummary {
                    id: id.to_string(),
                    name: template.name.clone(),
                    acts: acts.len(),
                    expected_secs: acts.iter().map(|a| a.time.expected).sum(),
                });
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if summaries.is_empty() {
                println!("No rituals in {}", store.rituals_path().display());
            } else {
                for s in &summaries {
                    println!(
                        "{:<16} {:<24} {:>3} acts  {}",
                        s.id,
                        s.name,
                        s.acts,
                        format_duration(s.expected_secs as i64)
                    );
                }
            }
        }
        RitualAction::Show { id, json } => {
            let catalog = store.load()?;
            let acts = expand(&id, &catalog)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&acts)?);
            } else {
                for (i, act) in acts.iter().enumerate() {
                    let duration = if act.is_timed() {
                        format_duration(act.time.expected as i64)
                    } else {
                        "-".to_string()
                    };
                    println!("{:>2}. {:<28} {:>8}", i + 1, act.name, duration);
                    if let Some(description) = &act.description {
                        println!("    {description}");
                    }
                }
            }
        }
        RitualAction::Validate => {
            let catalog = store.load()?;
            validate_catalog(&catalog)?;
            println!("ok: {} rituals", catalog.templates().count());
        }
        RitualAction::Init { force } => {
            if store.write_sample(force)? {
                println!("wrote {}", store.rituals_path().display());
            } else {
                println!(
                    "{} already exists (use --force to overwrite)",
                    store.rituals_path().display()
                );
            }
        }
    }
    Ok(())
}
