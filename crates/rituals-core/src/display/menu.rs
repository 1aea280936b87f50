use serde::{Deserialize, Serialize};

use crate::ritual::RitualCatalog;

pub const MENU_TITLE: &str = "Rituals";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Template id to launch.
    pub id: String,
    pub label: String,
}

/// The top-level ritual picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub title: String,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    /// One entry per template, in catalog order. Live instances are not listed.
    pub fn from_catalog(catalog: &RitualCatalog) -> Self {
        Self {
            title: MENU_TITLE.to_string(),
            entries: catalog
                .templates()
                .map(|(id, template)| MenuEntry {
                    id: id.to_string(),
                    label: template.name.clone(),
                })
                .collect(),
        }
    }

    /// Resolve a selection typed as a 1-based position, a template id, or a label.
    pub fn select(&self, choice: &str) -> Option<&MenuEntry> {
        let choice = choice.trim();
        if let Ok(n) = choice.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| self.entries.get(i));
        }
        self.entries
            .iter()
            .find(|e| e.id == choice)
            .or_else(|| self.entries.iter().find(|e| e.label.eq_ignore_ascii_case(choice)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ritual::RitualTemplate;

    fn menu() -> Menu {
        let mut catalog = RitualCatalog::new();
        for (id, name) in [("am", "Morning"), ("pm", "Evening")] {
            catalog.insert_template(
                id,
                RitualTemplate {
                    name: name.into(),
                    acts: vec![],
                },
            );
        }
        catalog.launch("am", 1).unwrap();
        Menu::from_catalog(&catalog)
    }

    #[test]
    fn lists_templates_only() {
        let menu = menu();
        assert_eq!(menu.title, MENU_TITLE);
        let ids: Vec<&str> = menu.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["am", "pm"]);
    }

    #[test]
    fn select_by_position_id_or_label() {
        let menu = menu();
        assert_eq!(menu.select("2").unwrap().id, "pm");
        assert_eq!(menu.select("am").unwrap().label, "Morning");
        assert_eq!(menu.select("evening").unwrap().id, "pm");
        assert!(menu.select("0").is_none());
        assert!(menu.select("3").is_none());
        assert!(menu.select("noon").is_none());
    }
}
