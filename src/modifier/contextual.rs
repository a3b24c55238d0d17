//! Contextual modifier producers: functions evaluated at read time against
//! `(source, target, context)` rather than fixed payloads.
//!
//! Hooks are held as `Arc<dyn Fn(...) + Send + Sync>` so that condition and
//! equipment instances carrying them can be cloned around freely.

use std::fmt;
use std::sync::Arc;

use super::ModifierKind;
use crate::ids::{EntityId, ModifierId};

/// Ambient information a contextual modifier function may consult beyond the
/// source/target identity — e.g. which weapon slot an attack is using, or
/// whether the target is prone. Kept as a small tag bag rather than a
/// reference to live entity state, so richer context is added by pushing
/// more tags instead of widening this struct's fields and the function
/// signature stays stable.
#[derive(Debug, Clone, Default)]
pub struct RollContext {
    pub tags: Vec<String>,
}

impl RollContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

pub type ModifierFn =
    Arc<dyn Fn(EntityId, Option<EntityId>, &RollContext) -> ModifierKind + Send + Sync>;

/// A modifier whose payload is produced by a pure function of
/// `(source_id, target_id, context)` rather than fixed at construction time.
#[derive(Clone)]
pub struct ContextualModifier {
    pub id: ModifierId,
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub label: String,
    pub produce: ModifierFn,
}

impl ContextualModifier {
    pub fn new(
        source_entity_id: EntityId,
        target_entity_id: EntityId,
        label: impl Into<String>,
        produce: ModifierFn,
    ) -> Self {
        Self {
            id: ModifierId::new(),
            source_entity_id,
            target_entity_id,
            label: label.into(),
            produce,
        }
    }

    pub fn evaluate(&self, context: &RollContext) -> ModifierKind {
        (self.produce)(
            self.source_entity_id,
            Some(self.target_entity_id),
            context,
        )
    }
}

impl fmt::Debug for ContextualModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextualModifier")
            .field("id", &self.id)
            .field("source_entity_id", &self.source_entity_id)
            .field("target_entity_id", &self.target_entity_id)
            .field("label", &self.label)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_invokes_closure_with_identity() {
        let source = EntityId::new();
        let target = EntityId::new();
        let modifier = ContextualModifier::new(source, target, "Bless", Arc::new(|_s, _t, _ctx| {
            ModifierKind::Numerical { value: 4 }
        }));
        match modifier.evaluate(&RollContext::new()) {
            ModifierKind::Numerical { value } => assert_eq!(value, 4),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn context_tags_are_queryable() {
        let context = RollContext::new().with_tag("prone");
        assert!(context.has_tag("prone"));
        assert!(!context.has_tag("blinded"));
    }
}
