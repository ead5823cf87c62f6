//! Sequence scripts.

use crate::core::Sequence;

use super::ScriptGenerator;

impl ScriptGenerator {
    pub(super) fn create_sequence_script(&self, sequence: &Sequence) -> String {
        let mut sql = format!("CREATE SEQUENCE {}", self.qualified_name(&sequence.name));
        if let Some(start) = sequence.start_with {
            sql.push_str(&format!(" START WITH {}", start));
        }
        if let Some(increment) = sequence.increment_by {
            sql.push_str(&format!(" INCREMENT BY {}", increment));
        }
        if let Some(min) = sequence.min_value {
            sql.push_str(&format!(" MINVALUE {}", min));
        }
        if let Some(max) = sequence.max_value {
            sql.push_str(&format!(" MAXVALUE {}", max));
        }
        if sequence.cycle {
            sql.push_str(" CYCLE");
        }
        sql
    }

    pub(super) fn drop_sequence_script(&self, sequence: &Sequence) -> String {
        format!("DROP SEQUENCE {}", self.qualified_name(&sequence.name))
    }
}
