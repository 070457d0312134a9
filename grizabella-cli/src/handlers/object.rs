//! Object instance commands: upsert, get, delete, find.

use crate::context::GrizabellaCliContext;
use crate::output::*;
use crate::utils::{coerce_properties, read_json_arg};
use grizabella::prelude::*;
use uuid::Uuid;

pub async fn upsert(
    ctx: &GrizabellaCliContext,
    type_name: &str,
    id: Option<Uuid>,
    properties: &str,
    weight: Option<f64>,
    output_format: &str,
) -> Result<()> {
    let object_type = ctx
        .db
        .get_object_type(type_name)
        .ok_or_else(|| GrizabellaError::NotFound(format!("object type '{}' does not exist", type_name)))?;
    let raw = read_json_arg(properties)?;
    let props = coerce_properties(&object_type, &raw)?;
    let stored = ctx.db.upsert_object(type_name, id, props, weight).await?;
    if output_format == "json" {
        print_json(&stored);
    } else {
        print_object(&stored);
    }
    Ok(())
}

pub async fn get(ctx: &GrizabellaCliContext, type_name: &str, id: Uuid, output_format: &str) -> Result<()> {
    match ctx.db.get_object_by_id(type_name, id).await? {
        Some(object) => {
            if output_format == "json" {
                print_json(&object);
            } else {
                print_object(&object);
            }
        }
        None => println!("{}", format_warning(&format!("object '{}' not found", id))),
    }
    Ok(())
}

pub async fn delete(ctx: &GrizabellaCliContext, type_name: &str, id: Uuid, output_format: &str) -> Result<()> {
    let deleted = ctx.db.delete_object(type_name, id).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "deleted": deleted }));
    } else if deleted {
        println!("{}", format_success(&format!("object '{}' deleted", id)));
    } else {
        println!("{}", format_warning(&format!("object '{}' not found", id)));
    }
    Ok(())
}

pub async fn find(
    ctx: &GrizabellaCliContext,
    type_name: &str,
    filters: &[RelFilter],
    limit: Option<usize>,
    output_format: &str,
) -> Result<()> {
    let objects = ctx.db.find_objects(type_name, filters, limit).await?;
    if output_format == "json" {
        print_json(&objects);
    } else {
        print_object_list(&objects);
    }
    Ok(())
}
