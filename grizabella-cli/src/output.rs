//! Styled terminal output and the JSON error envelope.

use colored::*;
use grizabella::prelude::*;
use serde_json::json;

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor { r: 34, g: 197, b: 94 }
    }

    pub fn error() -> Color {
        Color::TrueColor { r: 239, g: 68, b: 68 }
    }

    pub fn warning() -> Color {
        Color::TrueColor { r: 245, g: 158, b: 11 }
    }

    pub fn info() -> Color {
        Color::TrueColor { r: 59, g: 130, b: 246 }
    }

    pub fn muted() -> Color {
        Color::TrueColor { r: 148, g: 163, b: 184 }
    }

    pub fn primary() -> Color {
        Color::White
    }

    pub fn accent() -> Color {
        Color::TrueColor { r: 59, g: 130, b: 246 }
    }
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".color(CliColors::success()).bold(), msg.color(CliColors::success()))
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".color(CliColors::error()).bold(), msg.color(CliColors::error()))
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".color(CliColors::warning()).bold(), msg.color(CliColors::warning()))
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".color(CliColors::info()).bold(), msg.color(CliColors::info()))
}

/// Emit a `GrizabellaError` in the JSON error envelope or as colored
/// text, depending on `output_format`.
pub fn output_error(error: &GrizabellaError, output_format: &str) {
    if output_format == "json" {
        let mut body = json!({
            "error": {
                "code": error.code(),
                "category": error.category(),
                "message": error.to_string(),
                "retryable": error.retryable(),
            }
        });
        if let GrizabellaError::PartialWrite { stores_diverged, repair_id } = error {
            body["error"]["stores_diverged"] = json!(stores_diverged);
            body["error"]["repair_id"] = json!(repair_id.to_string());
        }
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_else(|_| "{}".to_string()));
    } else {
        eprintln!("{}", format_error(&error.to_string()));
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string()));
}

pub fn print_object_type(def: &ObjectTypeDefinition) {
    println!("{}", format!("━━━ Object Type: {} ━━━", def.name).color(CliColors::accent()).bold());
    if let Some(desc) = &def.description {
        println!("{}: {}", "Description".color(CliColors::muted()), desc);
    }
    println!("{:<20} {:<10} {:<5} {:<8} {}", "Property".color(CliColors::muted()).bold(), "Type", "PK", "Unique", "Nullable");
    for prop in &def.properties {
        println!(
            "{:<20} {:<10} {:<5} {:<8} {}",
            prop.name.color(CliColors::primary()),
            prop.data_type.to_string().color(CliColors::info()),
            if prop.is_primary_key { "yes" } else { "" },
            if prop.is_unique { "yes" } else { "" },
            prop.is_nullable
        );
    }
}

pub fn print_object_type_list(defs: &[ObjectTypeDefinition]) {
    if defs.is_empty() {
        println!("{}", format_info("No object types defined."));
        return;
    }
    for def in defs {
        println!("{} ({} properties)", def.name.color(CliColors::accent()).bold(), def.properties.len());
    }
}

pub fn print_relation_type(def: &RelationTypeDefinition) {
    println!("{}", format!("━━━ Relation Type: {} ━━━", def.name).color(CliColors::info()).bold());
    println!("{}: {}", "Source types".color(CliColors::muted()), def.source_types.join(", "));
    println!("{}: {}", "Target types".color(CliColors::muted()), def.target_types.join(", "));
    for prop in &def.properties {
        println!("  {} : {}", prop.name, prop.data_type);
    }
}

pub fn print_relation_type_list(defs: &[RelationTypeDefinition]) {
    if defs.is_empty() {
        println!("{}", format_info("No relation types defined."));
        return;
    }
    for def in defs {
        println!(
            "{} [{}] -> [{}]",
            def.name.color(CliColors::info()).bold(),
            def.source_types.join(","),
            def.target_types.join(",")
        );
    }
}

pub fn print_embedding_definition(def: &EmbeddingDefinition) {
    println!("{}", format!("━━━ Embedding Definition: {} ━━━", def.name).color(CliColors::info()).bold());
    println!("{}: {}", "Object type".color(CliColors::muted()), def.object_type_name);
    println!("{}: {}", "Source property".color(CliColors::muted()), def.source_property_name);
    println!("{}: {}", "Model".color(CliColors::muted()), def.embedding_model_id);
    if let Some(dims) = def.dimensions {
        println!("{}: {}", "Dimensions".color(CliColors::muted()), dims);
    }
}

pub fn print_embedding_definition_list(defs: &[EmbeddingDefinition]) {
    if defs.is_empty() {
        println!("{}", format_info("No embedding definitions defined."));
        return;
    }
    for def in defs {
        println!(
            "{} ({}.{} via {})",
            def.name.color(CliColors::info()).bold(),
            def.object_type_name,
            def.source_property_name,
            def.embedding_model_id
        );
    }
}

pub fn print_object(object: &ObjectInstance) {
    println!(
        "{}",
        format!("━━━ {} {} ━━━", object.object_type_name, object.id()).color(CliColors::accent()).bold()
    );
    println!("{}: {}", "Weight".color(CliColors::muted()), object.base.weight);
    println!(
        "{}: {}",
        "Upserted".color(CliColors::muted()),
        object.base.upsert_date.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let mut names: Vec<_> = object.properties.keys().collect();
    names.sort();
    for name in names {
        println!("  {}: {}", name.color(CliColors::muted()), object.properties[name].to_wire());
    }
}

pub fn print_object_list(objects: &[ObjectInstance]) {
    if objects.is_empty() {
        println!("{}", format_info("No objects found."));
        return;
    }
    println!("{}", format_info(&format!("Found {} object(s):", objects.len())));
    for object in objects {
        println!("  {} {}", object.id().to_string().color(CliColors::accent()), object.object_type_name);
    }
}

pub fn print_relation(relation: &RelationInstance) {
    println!(
        "{}",
        format!("━━━ {} {} ━━━", relation.relation_type_name, relation.id()).color(CliColors::info()).bold()
    );
    println!("{}: {}", "Source".color(CliColors::muted()), relation.source_id.to_string().color(CliColors::accent()));
    println!("{}: {}", "Target".color(CliColors::muted()), relation.target_id.to_string().color(CliColors::accent()));
    for (name, value) in &relation.properties {
        println!("  {}: {}", name.color(CliColors::muted()), value.to_wire());
    }
}

pub fn print_relation_list(relations: &[RelationInstance]) {
    if relations.is_empty() {
        println!("{}", format_info("No relations found."));
        return;
    }
    println!("{}", format_info(&format!("Found {} relation(s):", relations.len())));
    for relation in relations {
        println!(
            "  {:<20} {} {} {}",
            relation.relation_type_name.color(CliColors::info()),
            relation.source_id.to_string().color(CliColors::accent()),
            "→".color(CliColors::muted()),
            relation.target_id.to_string().color(CliColors::accent())
        );
    }
}

pub fn print_similar(results: &[(ObjectInstance, f32)]) {
    if results.is_empty() {
        println!("{}", format_info("No similar objects found."));
        return;
    }
    for (i, (object, score)) in results.iter().enumerate() {
        println!(
            "{}. [{:.4}] {} {}",
            format!("{}", i + 1).color(CliColors::muted()),
            score,
            object.object_type_name.color(CliColors::info()),
            object.id().to_string().color(CliColors::accent())
        );
    }
}

pub fn print_query_result(result: &QueryResult) {
    if result.cancelled {
        println!("{}", format_warning("Query exceeded its deadline; result is partial."));
    }
    for err in &result.errors {
        println!("{}", format_warning(err));
    }
    print_object_list(&result.instances);
}
