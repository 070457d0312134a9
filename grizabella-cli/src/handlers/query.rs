//! Similarity search and complex boolean query commands.

use crate::context::GrizabellaCliContext;
use crate::output::*;
use crate::utils::read_json_arg;
use grizabella::prelude::*;
use grizabella::query::{Clause, Component, EmbeddingSearch, GraphHop};
use std::time::Duration;
use uuid::Uuid;

pub async fn similar(
    ctx: &GrizabellaCliContext,
    embedding_def: &str,
    text: &str,
    limit: usize,
    filters: &[RelFilter],
    output_format: &str,
) -> Result<()> {
    let filter = if filters.is_empty() { None } else { Some(filters) };
    let results = ctx.db.find_similar(embedding_def, text, limit, filter).await?;
    if output_format == "json" {
        let as_json: Vec<_> = results
            .iter()
            .map(|(o, score)| serde_json::json!({ "object": o, "score": score }))
            .collect();
        print_json(&as_json);
    } else {
        print_similar(&results);
    }
    Ok(())
}

pub async fn neighbors(
    ctx: &GrizabellaCliContext,
    object_id: Uuid,
    object_type: &str,
    n: usize,
    output_format: &str,
) -> Result<()> {
    let results = ctx.db.search_similar_objects(object_id, object_type, n, None).await?;
    if output_format == "json" {
        let as_json: Vec<_> = results
            .iter()
            .map(|(o, score)| serde_json::json!({ "object": o, "score": score }))
            .collect();
        print_json(&as_json);
    } else {
        print_similar(&results);
    }
    Ok(())
}

pub async fn embed(ctx: &GrizabellaCliContext, embedding_def: &str, text: &str, output_format: &str) -> Result<()> {
    let vector = ctx.db.get_embedding_vector_for_text(text, embedding_def).await?;
    if output_format == "json" {
        print_json(&vector);
    } else {
        println!("{}", format_info(&format!("{} dimensions", vector.len())));
    }
    Ok(())
}

/// Run a boolean query described by a JSON document of the shape:
/// `{"object_type": "...", "filters": ["year:gt:2010"], "hops": [{"relation_type": "...", "direction": "out", "target_type": "..."}]}`
/// — a single flat `Component`, the common case for ad-hoc CLI queries.
/// Richer boolean trees are only reachable through the library API.
pub async fn complex(ctx: &GrizabellaCliContext, spec: &str, timeout_secs: Option<u64>, output_format: &str) -> Result<()> {
    let raw = read_json_arg(spec)?;
    let object_type = raw
        .get("object_type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| GrizabellaError::Validation("query spec requires an 'object_type' field".to_string()))?;

    let mut component = Component::new(object_type);

    if let Some(filters) = raw.get("filters").and_then(|v| v.as_array()) {
        for f in filters {
            let expr = f
                .as_str()
                .ok_or_else(|| GrizabellaError::Validation("each filter must be a string".to_string()))?;
            component = component.with_filter(crate::utils::parse_filter(expr)?);
        }
    }

    if let Some(hops) = raw.get("hops").and_then(|v| v.as_array()) {
        for hop in hops {
            let relation_type = hop
                .get("relation_type")
                .and_then(|v| v.as_str())
                .ok_or_else(|| GrizabellaError::Validation("each hop requires 'relation_type'".to_string()))?;
            let direction = hop
                .get("direction")
                .and_then(|v| v.as_str())
                .map(crate::utils::parse_direction)
                .transpose()?
                .unwrap_or(Direction::Outgoing);
            let target_type = hop
                .get("target_type")
                .and_then(|v| v.as_str())
                .ok_or_else(|| GrizabellaError::Validation("each hop requires 'target_type'".to_string()))?;
            component = component.with_graph_hop(GraphHop::new(relation_type, direction, target_type));
        }
    }

    if let Some(search_text) = raw.get("embedding_search_text").and_then(|v| v.as_str()) {
        let embedding_def = raw
            .get("embedding_def")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GrizabellaError::Validation("'embedding_search_text' requires 'embedding_def'".to_string()))?;
        let vector = ctx.db.get_embedding_vector_for_text(search_text, embedding_def).await?;
        component = component.with_embedding_search(EmbeddingSearch::new(embedding_def, vector));
    }

    let query = Query::new(Clause::from(component));
    let timeout = timeout_secs.map(Duration::from_secs);
    let result = ctx.db.execute_complex_query(&query, timeout).await?;

    if output_format == "json" {
        print_json(&result.instances);
    } else {
        print_query_result(&result);
    }
    Ok(())
}
