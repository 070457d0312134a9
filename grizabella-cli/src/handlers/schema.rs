//! Object-type, relation-type, and embedding-definition schema commands.

use crate::context::GrizabellaCliContext;
use crate::output::*;
use crate::utils::read_json_arg;
use grizabella::prelude::*;

pub async fn create_object_type(ctx: &GrizabellaCliContext, definition: &str, output_format: &str) -> Result<()> {
    let raw = read_json_arg(definition)?;
    let def: ObjectTypeDefinition =
        serde_json::from_value(raw).map_err(|e| GrizabellaError::Validation(format!("malformed object type: {}", e)))?;
    let name = def.name.clone();
    ctx.db.create_object_type(def).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "created": name }));
    } else {
        println!("{}", format_success(&format!("object type '{}' created", name)));
    }
    Ok(())
}

pub fn get_object_type(ctx: &GrizabellaCliContext, name: &str, output_format: &str) -> Result<()> {
    match ctx.db.get_object_type(name) {
        Some(def) => {
            if output_format == "json" {
                print_json(&def);
            } else {
                print_object_type(&def);
            }
        }
        None => println!("{}", format_warning(&format!("object type '{}' not found", name))),
    }
    Ok(())
}

pub fn list_object_types(ctx: &GrizabellaCliContext, output_format: &str) -> Result<()> {
    let defs = ctx.db.list_object_types();
    if output_format == "json" {
        print_json(&defs);
    } else {
        print_object_type_list(&defs);
    }
    Ok(())
}

pub async fn delete_object_type(ctx: &GrizabellaCliContext, name: &str, output_format: &str) -> Result<()> {
    ctx.db.delete_object_type(name).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "deleted": name }));
    } else {
        println!("{}", format_success(&format!("object type '{}' deleted", name)));
    }
    Ok(())
}

pub async fn create_relation_type(ctx: &GrizabellaCliContext, definition: &str, output_format: &str) -> Result<()> {
    let raw = read_json_arg(definition)?;
    let def: RelationTypeDefinition = serde_json::from_value(raw)
        .map_err(|e| GrizabellaError::Validation(format!("malformed relation type: {}", e)))?;
    let name = def.name.clone();
    ctx.db.create_relation_type(def).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "created": name }));
    } else {
        println!("{}", format_success(&format!("relation type '{}' created", name)));
    }
    Ok(())
}

pub fn get_relation_type(ctx: &GrizabellaCliContext, name: &str, output_format: &str) -> Result<()> {
    match ctx.db.get_relation_type(name) {
        Some(def) => {
            if output_format == "json" {
                print_json(&def);
            } else {
                print_relation_type(&def);
            }
        }
        None => println!("{}", format_warning(&format!("relation type '{}' not found", name))),
    }
    Ok(())
}

pub fn list_relation_types(ctx: &GrizabellaCliContext, output_format: &str) -> Result<()> {
    let defs = ctx.db.list_relation_types();
    if output_format == "json" {
        print_json(&defs);
    } else {
        print_relation_type_list(&defs);
    }
    Ok(())
}

pub async fn delete_relation_type(ctx: &GrizabellaCliContext, name: &str, output_format: &str) -> Result<()> {
    ctx.db.delete_relation_type(name).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "deleted": name }));
    } else {
        println!("{}", format_success(&format!("relation type '{}' deleted", name)));
    }
    Ok(())
}

pub async fn create_embedding_definition(ctx: &GrizabellaCliContext, definition: &str, output_format: &str) -> Result<()> {
    let raw = read_json_arg(definition)?;
    let def: EmbeddingDefinition = serde_json::from_value(raw)
        .map_err(|e| GrizabellaError::Validation(format!("malformed embedding definition: {}", e)))?;
    let name = def.name.clone();
    ctx.db.create_embedding_definition(def).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "created": name }));
    } else {
        println!("{}", format_success(&format!("embedding definition '{}' created", name)));
    }
    Ok(())
}

pub fn get_embedding_definition(ctx: &GrizabellaCliContext, name: &str, output_format: &str) -> Result<()> {
    match ctx.db.get_embedding_definition(name) {
        Some(def) => {
            if output_format == "json" {
                print_json(&def);
            } else {
                print_embedding_definition(&def);
            }
        }
        None => println!("{}", format_warning(&format!("embedding definition '{}' not found", name))),
    }
    Ok(())
}

pub fn list_embedding_definitions(ctx: &GrizabellaCliContext, output_format: &str) -> Result<()> {
    let defs = ctx.db.list_embedding_definitions();
    if output_format == "json" {
        print_json(&defs);
    } else {
        print_embedding_definition_list(&defs);
    }
    Ok(())
}

pub async fn delete_embedding_definition(ctx: &GrizabellaCliContext, name: &str, output_format: &str) -> Result<()> {
    ctx.db.delete_embedding_definition(name).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "deleted": name }));
    } else {
        println!("{}", format_success(&format!("embedding definition '{}' deleted", name)));
    }
    Ok(())
}

pub async fn backfill(
    ctx: &GrizabellaCliContext,
    object_type: &str,
    embedding_definition: &str,
    output_format: &str,
) -> Result<()> {
    let embedded = ctx.db.backfill_embeddings(object_type, embedding_definition).await?;
    if output_format == "json" {
        print_json(&serde_json::json!({ "embedded": embedded }));
    } else {
        println!("{}", format_success(&format!("backfilled {} object(s)", embedded)));
    }
    Ok(())
}
