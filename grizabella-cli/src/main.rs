use clap::{Args, Parser, Subcommand};
use colored::*;
use grizabella::prelude::*;
use grizabella_cli::*;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "grizabella")]
#[command(about = "Grizabella knowledge engine CLI", long_about = None)]
#[command(version = grizabella::VERSION)]
struct Cli {
    /// Custom data directory for storage
    #[arg(long, short, global = true)]
    data_dir: Option<String>,

    /// Output format (table, json) - use json for tool integration
    #[arg(long, short, default_value = "table", global = true)]
    output: String,

    /// Use machine-readable output (alias for --output json)
    #[arg(long, global = true)]
    machine: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display version information
    Version,

    /// Object-type, relation-type, and embedding-definition schema commands
    #[command(subcommand)]
    Schema(SchemaCommands),

    /// Object instance commands
    #[command(subcommand)]
    Object(ObjectCommands),

    /// Relation instance commands
    #[command(subcommand)]
    Relation(RelationCommands),

    /// Similarity search and complex query commands
    #[command(subcommand)]
    Query(QueryCommands),
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Create an object type from a JSON definition
    CreateObjectType(DefinitionArgs),
    /// Get an object type by name
    GetObjectType(NameArgs),
    /// List all object types
    ListObjectTypes,
    /// Delete an object type
    DeleteObjectType(NameArgs),

    /// Create a relation type from a JSON definition
    CreateRelationType(DefinitionArgs),
    /// Get a relation type by name
    GetRelationType(NameArgs),
    /// List all relation types
    ListRelationTypes,
    /// Delete a relation type
    DeleteRelationType(NameArgs),

    /// Create an embedding definition from a JSON definition
    CreateEmbeddingDef(DefinitionArgs),
    /// Get an embedding definition by name
    GetEmbeddingDef(NameArgs),
    /// List all embedding definitions
    ListEmbeddingDefs,
    /// Delete an embedding definition
    DeleteEmbeddingDef(NameArgs),

    /// Backfill embeddings for existing objects of a type
    Backfill(BackfillArgs),
}

#[derive(Subcommand)]
enum ObjectCommands {
    /// Create or update an object instance
    Upsert(UpsertObjectArgs),
    /// Get an object instance by id
    Get(ObjectIdArgs),
    /// Delete an object instance
    Delete(ObjectIdArgs),
    /// Find object instances matching property filters
    Find(FindObjectsArgs),
}

#[derive(Subcommand)]
enum RelationCommands {
    /// Add a relation instance between two objects
    Add(AddRelationArgs),
    /// Get relations between a source and target object
    Get(GetRelationArgs),
    /// Delete a relation instance
    Delete(RelationIdArgs),
    /// List relations outgoing from an object
    Outgoing(NeighborArgs),
    /// List relations incoming to an object
    Incoming(NeighborArgs),
    /// Query relations by type, endpoint, or both
    Query(RelationQueryArgs),
}

#[derive(Subcommand)]
enum QueryCommands {
    /// Find objects whose embedding is similar to a query text
    Similar(SimilarArgs),
    /// Find objects similar to an already-stored object
    Neighbors(NeighborsArgs),
    /// Compute the raw embedding vector for a text
    Embed(EmbedArgs),
    /// Run a structured boolean query from a JSON document
    Complex(ComplexQueryArgs),
}

#[derive(Args)]
struct DefinitionArgs {
    /// Inline JSON, or `@path` to read the definition from a file
    definition: String,
}

#[derive(Args)]
struct NameArgs {
    name: String,
}

#[derive(Args)]
struct BackfillArgs {
    object_type: String,
    embedding_definition: String,
}

#[derive(Args)]
struct UpsertObjectArgs {
    type_name: String,
    /// Inline JSON, or `@path` to read the properties from a file
    properties: String,
    /// Existing object id to update; omit to create a new object
    #[arg(long)]
    id: Option<Uuid>,
    /// Instance weight in [0, 10]; defaults to 1.0 for new objects
    #[arg(long)]
    weight: Option<f64>,
}

#[derive(Args)]
struct ObjectIdArgs {
    type_name: String,
    id: Uuid,
}

#[derive(Args)]
struct FindObjectsArgs {
    type_name: String,
    /// Filter expression of the form `property:operator:value`, repeatable
    #[arg(long = "filter", short = 'f')]
    filters: Vec<String>,
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args)]
struct AddRelationArgs {
    relation_type: String,
    source_type: String,
    source_id: Uuid,
    target_type: String,
    target_id: Uuid,
    /// Inline JSON, or `@path` to read the properties from a file
    #[arg(default_value = "{}")]
    properties: String,
    /// Instance weight in [0, 10]; defaults to 1.0 for new relations
    #[arg(long)]
    weight: Option<f64>,
}

#[derive(Args)]
struct GetRelationArgs {
    source_id: Uuid,
    target_id: Uuid,
    relation_type: String,
}

#[derive(Args)]
struct RelationIdArgs {
    relation_type: String,
    id: Uuid,
}

#[derive(Args)]
struct NeighborArgs {
    id: Uuid,
    #[arg(long)]
    relation_type: Option<String>,
}

#[derive(Args)]
struct RelationQueryArgs {
    #[arg(long)]
    relation_type: Option<String>,
    #[arg(long)]
    source_id: Option<Uuid>,
    #[arg(long)]
    target_id: Option<Uuid>,
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args)]
struct SimilarArgs {
    embedding_def: String,
    text: String,
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Filter expression of the form `property:operator:value`, repeatable
    #[arg(long = "filter", short = 'f')]
    filters: Vec<String>,
}

#[derive(Args)]
struct NeighborsArgs {
    object_type: String,
    id: Uuid,
    #[arg(long, default_value_t = 10)]
    n: usize,
}

#[derive(Args)]
struct EmbedArgs {
    embedding_def: String,
    text: String,
}

#[derive(Args)]
struct ComplexQueryArgs {
    /// Inline JSON, or `@path` to read the query document from a file
    spec: String,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli_args = Cli::parse();

    let output_format = if cli_args.machine {
        "json".to_string()
    } else if let Ok(env_output) = std::env::var("GRIZABELLA_OUTPUT") {
        env_output
    } else {
        cli_args.output.clone()
    };

    if let Err(e) = run(cli_args, &output_format).await {
        output_error(&e, &output_format);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli_args: Cli, output_format: &str) -> Result<()> {
    if matches!(cli_args.command, Commands::Version) {
        println!(
            "{} {} {}",
            "Grizabella CLI".color(CliColors::accent()).bold(),
            "v".color(CliColors::muted()),
            grizabella::VERSION.color(CliColors::success()).bold()
        );
        return Ok(());
    }

    let ctx = GrizabellaCliContext::new(cli_args.data_dir).await?;

    match cli_args.command {
        Commands::Version => unreachable!("handled above"),
        Commands::Schema(cmd) => handle_schema_command(cmd, &ctx, output_format).await,
        Commands::Object(cmd) => handle_object_command(cmd, &ctx, output_format).await,
        Commands::Relation(cmd) => handle_relation_command(cmd, &ctx, output_format).await,
        Commands::Query(cmd) => handle_query_command(cmd, &ctx, output_format).await,
    }
}

async fn handle_schema_command(cmd: SchemaCommands, ctx: &GrizabellaCliContext, output_format: &str) -> Result<()> {
    use handlers::schema::*;
    match cmd {
        SchemaCommands::CreateObjectType(a) => create_object_type(ctx, &a.definition, output_format).await,
        SchemaCommands::GetObjectType(a) => get_object_type(ctx, &a.name, output_format),
        SchemaCommands::ListObjectTypes => list_object_types(ctx, output_format),
        SchemaCommands::DeleteObjectType(a) => delete_object_type(ctx, &a.name, output_format).await,

        SchemaCommands::CreateRelationType(a) => create_relation_type(ctx, &a.definition, output_format).await,
        SchemaCommands::GetRelationType(a) => get_relation_type(ctx, &a.name, output_format),
        SchemaCommands::ListRelationTypes => list_relation_types(ctx, output_format),
        SchemaCommands::DeleteRelationType(a) => delete_relation_type(ctx, &a.name, output_format).await,

        SchemaCommands::CreateEmbeddingDef(a) => create_embedding_definition(ctx, &a.definition, output_format).await,
        SchemaCommands::GetEmbeddingDef(a) => get_embedding_definition(ctx, &a.name, output_format),
        SchemaCommands::ListEmbeddingDefs => list_embedding_definitions(ctx, output_format),
        SchemaCommands::DeleteEmbeddingDef(a) => delete_embedding_definition(ctx, &a.name, output_format).await,

        SchemaCommands::Backfill(a) => backfill(ctx, &a.object_type, &a.embedding_definition, output_format).await,
    }
}

async fn handle_object_command(cmd: ObjectCommands, ctx: &GrizabellaCliContext, output_format: &str) -> Result<()> {
    use handlers::object::*;
    match cmd {
        ObjectCommands::Upsert(a) => upsert(ctx, &a.type_name, a.id, &a.properties, a.weight, output_format).await,
        ObjectCommands::Get(a) => get(ctx, &a.type_name, a.id, output_format).await,
        ObjectCommands::Delete(a) => delete(ctx, &a.type_name, a.id, output_format).await,
        ObjectCommands::Find(a) => {
            let filters = a.filters.iter().map(|f| utils::parse_filter(f)).collect::<Result<Vec<_>>>()?;
            find(ctx, &a.type_name, &filters, a.limit, output_format).await
        }
    }
}

async fn handle_relation_command(cmd: RelationCommands, ctx: &GrizabellaCliContext, output_format: &str) -> Result<()> {
    use handlers::relation::*;
    match cmd {
        RelationCommands::Add(a) => {
            add(
                ctx,
                &a.relation_type,
                &a.source_type,
                a.source_id,
                &a.target_type,
                a.target_id,
                &a.properties,
                a.weight,
                output_format,
            )
            .await
        }
        RelationCommands::Get(a) => get(ctx, a.source_id, a.target_id, &a.relation_type, output_format).await,
        RelationCommands::Delete(a) => delete(ctx, &a.relation_type, a.id, output_format).await,
        RelationCommands::Outgoing(a) => outgoing(ctx, a.id, a.relation_type.as_deref(), output_format).await,
        RelationCommands::Incoming(a) => incoming(ctx, a.id, a.relation_type.as_deref(), output_format).await,
        RelationCommands::Query(a) => query(ctx, a.relation_type, a.source_id, a.target_id, a.limit, output_format).await,
    }
}

async fn handle_query_command(cmd: QueryCommands, ctx: &GrizabellaCliContext, output_format: &str) -> Result<()> {
    use handlers::query::*;
    match cmd {
        QueryCommands::Similar(a) => {
            let filters = a.filters.iter().map(|f| utils::parse_filter(f)).collect::<Result<Vec<_>>>()?;
            similar(ctx, &a.embedding_def, &a.text, a.limit, &filters, output_format).await
        }
        QueryCommands::Neighbors(a) => neighbors(ctx, a.id, &a.object_type, a.n, output_format).await,
        QueryCommands::Embed(a) => embed(ctx, &a.embedding_def, &a.text, output_format).await,
        QueryCommands::Complex(a) => complex(ctx, &a.spec, a.timeout_secs, output_format).await,
    }
}
