//! Relation instance commands: add, get, delete, and neighbor traversal.

use crate::context::GrizabellaCliContext;
use crate::output::*;
use crate::utils::{coerce_relation_properties, read_json_arg};
use grizabella::adapters::RelationQuery;
use grizabella::prelude::*;
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn add(
    ctx: &GrizabellaCliContext,
    relation_type: &str,
    source_type: &str,
    source_id: Uuid,
    target_type: &str,
    target_id: Uuid,
    properties: &str,
    weight: Option<f64>,
    output_format: &str,
) -> Result<()> {
    let relation_def = ctx
        .db
        .get_relation_type(relation_type)
        .ok_or_else(|| GrizabellaError::NotFound(format!("relation type '{}' does not exist", relation_type)))?;
    let raw = read_json_arg(properties)?;
    let props = coerce_relation_properties(&relation_def, &raw)?;
    let relation = ctx
        .db
        .add_relation(relation_type, source_type, source_id, target_type, target_id, props, weight)
        .await?;
    if output_format == "json" {
        print_json(&relation);
    } else {
        print_relation(&relation);
    }
    Ok(())
}

pub async fn get(
    ctx: &GrizabellaCliContext,
    source_id: Uuid,
    target_id: Uuid,
    relation_type: &str,
    output_format: &str,
) -> Result<()> {
    let relations = ctx.db.get_relation(source_id, target_id, relation_type).await?;
    if output_format == "json" {
        print_json(&relations);
    } else {
        print_relation_list(&relations);
    }
    Ok(())
}

pub async fn delete(ctx: &GrizabellaCliContext, relation_type: &str, id: Uuid, output_format: &str) -> Result<()> {
    let deleted = ctx.db.delete_relation(relation_type, id).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "deleted": deleted }));
    } else if deleted {
        println!("{}", format_success(&format!("relation '{}' deleted", id)));
    } else {
        println!("{}", format_warning(&format!("relation '{}' not found", id)));
    }
    Ok(())
}

pub async fn outgoing(
    ctx: &GrizabellaCliContext,
    id: Uuid,
    relation_type: Option<&str>,
    output_format: &str,
) -> Result<()> {
    let relations = ctx.db.get_outgoing_relations(id, relation_type).await?;
    if output_format == "json" {
        print_json(&relations);
    } else {
        print_relation_list(&relations);
    }
    Ok(())
}

pub async fn incoming(
    ctx: &GrizabellaCliContext,
    id: Uuid,
    relation_type: Option<&str>,
    output_format: &str,
) -> Result<()> {
    let relations = ctx.db.get_incoming_relations(id, relation_type).await?;
    if output_format == "json" {
        print_json(&relations);
    } else {
        print_relation_list(&relations);
    }
    Ok(())
}

pub async fn query(
    ctx: &GrizabellaCliContext,
    relation_type: Option<String>,
    source_id: Option<Uuid>,
    target_id: Option<Uuid>,
    limit: Option<usize>,
    output_format: &str,
) -> Result<()> {
    let relations = ctx
        .db
        .query_relations(RelationQuery {
            relation_type,
            source_id,
            target_id,
            limit,
            ..Default::default()
        })
        .await?;
    if output_format == "json" {
        print_json(&relations);
    } else {
        print_relation_list(&relations);
    }
    Ok(())
}
