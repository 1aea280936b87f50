//! The in-memory table of templates and live instances.
//!
//! On disk both live in one JSON object keyed by id, so a saved document looks
//! like the template file with launched instances appended after the templates.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{expand, RitualInstance, RitualTemplate};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RitualCatalog {
    templates: IndexMap<String, RitualTemplate>,
    instances: IndexMap<String, RitualInstance>,
}

/// One value of the persisted document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RitualRecord {
    Instance(RitualInstance),
    Template(RitualTemplate),
}

#[derive(Serialize)]
#[serde(untagged)]
enum RitualRecordRef<'a> {
    Template(&'a RitualTemplate),
    Instance(&'a RitualInstance),
}

impl RitualCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(templates: IndexMap<String, RitualTemplate>) -> Self {
        Self {
            templates,
            instances: IndexMap::new(),
        }
    }

    pub fn insert_template(&mut self, id: impl Into<String>, template: RitualTemplate) {
        self.templates.insert(id.into(), template);
    }

    pub fn template(&self, id: &str) -> Option<&RitualTemplate> {
        self.templates.get(id)
    }

    /// Templates in document order.
    pub fn templates(&self) -> impl Iterator<Item = (&str, &RitualTemplate)> {
        self.templates.iter().map(|(id, t)| (id.as_str(), t))
    }

    pub fn instance(&self, id: &str) -> Option<&RitualInstance> {
        self.instances.get(id)
    }

    pub fn instance_mut(&mut self, id: &str) -> Option<&mut RitualInstance> {
        self.instances.get_mut(id)
    }

    pub fn instances(&self) -> impl Iterator<Item = (&str, &RitualInstance)> {
        self.instances.iter().map(|(id, i)| (id.as_str(), i))
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.instances.is_empty()
    }

    /// Copy a template into a new live instance and return the instance id.
    ///
    /// The id is the template id followed by the launch timestamp. A second
    /// launch within the same second gets a `-N` suffix.
    ///
    /// # Errors
    /// Fails when the template is unknown or its references cannot be expanded.
    pub fn launch(&mut self, template_id: &str, started: i64) -> Result<String> {
        let template = self
            .templates
            .get(template_id)
            .ok_or_else(|| CoreError::UnknownRitual(template_id.to_string()))?;
        let acts = expand(template_id, self)?;
        let instance = RitualInstance::launch(template_id, template, acts, started);

        let base = format!("{template_id}{started}");
        let mut id = base.clone();
        let mut n = 1;
        while self.contains_id(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        self.instances.insert(id.clone(), instance);
        Ok(id)
    }

    fn contains_id(&self, id: &str) -> bool {
        self.templates.contains_key(id) || self.instances.contains_key(id)
    }
}

impl Serialize for RitualCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.templates.len() + self.instances.len()))?;
        for (id, template) in &self.templates {
            map.serialize_entry(id, &RitualRecordRef::Template(template))?;
        }
        for (id, instance) in &self.instances {
            map.serialize_entry(id, &RitualRecordRef::Instance(instance))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RitualCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = IndexMap::<String, RitualRecord>::deserialize(deserializer)?;
        let mut catalog = RitualCatalog::new();
        for (id, record) in records {
            match record {
                RitualRecord::Template(t) => {
                    catalog.templates.insert(id, t);
                }
                RitualRecord::Instance(i) => {
                    catalog.instances.insert(id, i);
                }
            }
        }
        Ok(catalog)
    }
}
