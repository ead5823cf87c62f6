//! Trigger scripts.

use crate::core::{Table, Trigger, TriggerEvent, TriggerKind, TriggerTiming};

use super::{ObjectType, ScriptGenerator};

fn timing_sql(timing: TriggerTiming) -> &'static str {
    match timing {
        TriggerTiming::Before => "BEFORE",
        TriggerTiming::After => "AFTER",
    }
}

fn event_sql(event: TriggerEvent) -> &'static str {
    match event {
        TriggerEvent::Insert => "INSERT",
        TriggerEvent::Update => "UPDATE",
        TriggerEvent::Delete => "DELETE",
    }
}

impl ScriptGenerator {
    /// Active triggers whose kind is an enabled category.
    pub(super) fn trigger_enabled(&self, trigger: &Trigger) -> bool {
        let category = match trigger.kind {
            TriggerKind::Trigger => ObjectType::Trigger,
            TriggerKind::ColumnTrigger => ObjectType::ColumnTrigger,
        };
        trigger.active && self.enabled(category)
    }

    pub(super) fn create_trigger_script(&self, table: &Table, trigger: &Trigger) -> String {
        format!(
            "CREATE TRIGGER {} {} {} ON {} FOR EACH ROW {}",
            self.ident(&trigger.name),
            timing_sql(trigger.timing),
            event_sql(trigger.event),
            self.qualified_name(&table.name),
            trigger.body.trim()
        )
    }

    pub(super) fn drop_trigger_script(&self, trigger: &Trigger) -> String {
        format!("DROP TRIGGER {}", self.ident(&trigger.name))
    }
}
