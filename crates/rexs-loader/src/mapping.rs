//! External to internal component id mapping

use rexs_model::Component;
use std::collections::HashMap;

/// Maps the ids a document uses to dense internal ids.
///
/// Internal ids start at 1 and follow first-seen order. Scoped to a single
/// load.
#[derive(Debug, Clone)]
pub struct ComponentMapping {
    next_id: u64,
    ids: HashMap<String, u64>,
}

impl Default for ComponentMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentMapping {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ids: HashMap::new(),
        }
    }

    /// Assign the next internal id to `external_id`.
    ///
    /// A repeated external id is remapped to the new internal id; the earlier
    /// component stays in the model but can no longer be referenced.
    pub fn add(&mut self, external_id: &str) -> u64 {
        let internal_id = self.next_id;
        self.next_id += 1;
        if let Some(previous) = self.ids.insert(external_id.to_string(), internal_id) {
            tracing::warn!(
                external_id,
                previous,
                internal_id,
                "duplicate component id, later component wins"
            );
        }
        internal_id
    }

    #[must_use]
    pub fn internal_id(&self, external_id: &str) -> Option<u64> {
        self.ids.get(external_id).copied()
    }

    /// Resolve an external id to a built component
    #[must_use]
    pub fn get_component<'a>(
        &self,
        external_id: &str,
        components: &'a [Component],
    ) -> Option<&'a Component> {
        let internal_id = self.internal_id(external_id)?;
        components.iter().find(|c| c.internal_id() == internal_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
