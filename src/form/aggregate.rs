//! Shared character budgets across groups of fields
//!
//! For a group `{ present, properties, max }`:
//! - `present.max_length` = max minus the sizes of the other participants
//! - `present.char_rem`   = max minus the sizes of all participants, naming them
//! - `other.max_length`   = `present.max_length - size(present) + size(other)`
//!
//! The present property's limit is derived first and the others are derived
//! from it, so the dependency graph has no cycles.

use std::collections::HashMap;
use std::rc::Rc;

use super::context::FormContext;
use super::field::{Field, FieldCell};
use crate::i18n::keys;
use crate::observability::{Event, Logger};
use crate::reactive::Computed;
use crate::schema::{AggregateLengthSpec, Schema};

/// Installs every aggregate group of `schema` whose participants were all built.
///
/// Returns the number of installed groups. Groups with unbound participants
/// are skipped.
pub fn apply_aggregates(
    ctx: &FormContext,
    schema: &Schema,
    fields: &HashMap<String, Field>,
) -> usize {
    schema
        .aggregate_length
        .iter()
        .filter(|group| install(ctx, schema, group, fields))
        .count()
}

fn install(
    ctx: &FormContext,
    schema: &Schema,
    group: &AggregateLengthSpec,
    fields: &HashMap<String, Field>,
) -> bool {
    let missing: Vec<&str> = group
        .properties
        .iter()
        .filter(|p| !fields.contains_key(*p))
        .map(String::as_str)
        .collect();

    let present = match fields.get(&group.present_property) {
        Some(field) if missing.is_empty() => field,
        _ => {
            Logger::event(
                Event::AggregateSkipped,
                &[
                    ("missing", &missing.join(",")),
                    ("present", &group.present_property),
                    ("schema", &schema.name),
                ],
            );
            return false;
        }
    };

    let all_cells = cells_of(fields, group.properties.iter());
    let other_cells = cells_of(fields, group.others());

    let label = group
        .properties
        .iter()
        .map(|p| ctx.property_names.display_name(&schema.name, p))
        .collect::<Vec<_>>()
        .join(&ctx.aggregate_separator);

    // Remaining text over the whole group
    let char_rem = {
        let cells = all_cells.clone();
        let localizer = Rc::clone(&ctx.localizer);
        let max = group.max_length;
        let computed = Computed::new(move || {
            let used: i64 = cells.iter().map(|c| c.size() as i64).sum();
            localizer.get(
                keys::REMAINING_CHARACTERS_AGGREGATE,
                &[("count", (max - used).to_string()), ("properties", label.clone())],
            )
        });
        all_cells.iter().fold(computed, |c, cell| c.track(cell))
    };
    present.install_char_rem(char_rem);

    // Budget left for the present property
    let present_limit = {
        let cells = other_cells.clone();
        let max = group.max_length;
        let computed = Computed::new(move || {
            let used: i64 = cells.iter().map(|c| c.size() as i64).sum();
            Some(max - used)
        });
        other_cells.iter().fold(computed, |c, cell| c.track(cell))
    };
    present.install_max_length(present_limit.clone());

    // Budget left for each other participant, derived from the present one
    for name in group.others() {
        let other = &fields[name];
        let limit = {
            let source_limit = present_limit.clone();
            let present_cell = present.cell().clone();
            let other_cell = other.cell().clone();
            Computed::new(move || {
                source_limit
                    .get()
                    .map(|limit| limit - present_cell.size() as i64 + other_cell.size() as i64)
            })
            .track(&present_limit)
            .track(present.cell())
            .track(other.cell())
        };
        other.install_max_length(limit);
    }

    Logger::event(
        Event::AggregateInstalled,
        &[
            ("max_length", &group.max_length.to_string()),
            ("present", &group.present_property),
            ("schema", &schema.name),
        ],
    );

    true
}

fn cells_of<'a>(
    fields: &HashMap<String, Field>,
    names: impl Iterator<Item = &'a String>,
) -> Vec<FieldCell> {
    names
        .filter_map(|name| fields.get(name))
        .map(|field| field.cell().clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::builder::{build_fields, describe_fields};
    use serde_json::json;

    fn mail_schema() -> Schema {
        Schema::from_value(json!({
            "name": "mail",
            "properties": {
                "subject": { "type": "string" },
                "preview": { "type": "string" },
                "footer": { "type": "string" }
            },
            "aggregateLength": [{
                "presentProperty": "subject",
                "properties": ["subject", "preview"],
                "maxLength": 10
            }]
        }))
        .unwrap()
    }

    fn bind(schema: &Schema, names: &[&str]) -> HashMap<String, Field> {
        let descriptors = describe_fields(schema, names, None, &HashMap::new());
        build_fields(&FormContext::default(), &descriptors)
    }

    #[test]
    fn test_present_limit_tracks_others() {
        let schema = mail_schema();
        let fields = bind(&schema, &["subject", "preview"]);
        assert_eq!(apply_aggregates(&FormContext::default(), &schema, &fields), 1);

        assert_eq!(fields["subject"].max_length(), Some(10));
        fields["preview"].set("abc");
        assert_eq!(fields["subject"].max_length(), Some(7));
    }

    #[test]
    fn test_other_limit_follows_present() {
        let schema = mail_schema();
        let fields = bind(&schema, &["subject", "preview"]);
        apply_aggregates(&FormContext::default(), &schema, &fields);

        fields["preview"].set("abc");
        assert_eq!(fields["preview"].max_length(), Some(10));

        fields["subject"].set("hello");
        // 10 - 3 - 5 + 3
        assert_eq!(fields["preview"].max_length(), Some(5));
        assert_eq!(fields["subject"].max_length(), Some(7));
    }

    #[test]
    fn test_group_skipped_when_participant_unbound() {
        let schema = mail_schema();
        let fields = bind(&schema, &["subject", "footer"]);
        assert_eq!(apply_aggregates(&FormContext::default(), &schema, &fields), 0);
        // the plain string countdown stays
        assert_eq!(fields["subject"].max_length(), None);
    }
}
