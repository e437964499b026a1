//! Purpose: `botschema` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Successful commands print exactly one JSON document on stdout.
//! Invariants: Errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::error::Error as StdError;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use botschema::api::{
    API_URL_ENV, ApiConfig, Error, ErrorKind, HttpInvoker, RemoteInvoker, TIMEOUT_ENV, TOKEN_ENV,
    to_exit_code,
};
use botschema::core::naming::to_domain_name;
use botschema::core::object::Object;
use botschema::core::registry::Registry;
use botschema::core::schema::TypeDescriptor;
use botschema::types;
use clap::{Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(code);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `botschema --help`."));
            }
        },
    };

    let registry = types::registry()?;
    let output = match cli.command {
        Command::Types => types_json(registry),
        Command::Schema { type_name } => schema_json(registry.lookup(&type_name)?),
        Command::Decode {
            type_name,
            many,
            file,
            domain,
        } => {
            let raw = read_input(file.as_deref())?;
            decode_json(registry, &type_name, &raw, many, domain)?
        }
        Command::Call {
            method,
            type_name,
            many,
            args,
            domain,
            connection,
        } => {
            // Fail fast on an unknown type before touching the network.
            registry.lookup(&type_name)?;
            let arguments = match args {
                Some(text) => parse_json(&text, "--args")?,
                None => json!({}),
            };
            let invoker = HttpInvoker::new(&connection.resolve()?)?;
            let raw = invoker.invoke(&method, &arguments)?;
            decode_json(registry, &type_name, &raw, many, domain)?
        }
    };
    emit_json(&output);
    Ok(0)
}

#[derive(Parser)]
#[command(
    name = "botschema",
    version,
    about = "Decode bot protocol payloads into typed, validated objects",
    long_about = None,
    after_help = r#"EXAMPLES
  $ botschema types
  $ botschema schema Chat
  $ echo '{"id": 42, "type": "private"}' | botschema decode Chat
  $ botschema decode Update --many --file updates.json --domain
  $ BOTSCHEMA_TOKEN=123:abc botschema call getMe User

LOGGING
  Set RUST_LOG (e.g. RUST_LOG=botschema=debug) for diagnostics on stderr."#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "List the known object types")]
    Types,
    #[command(
        arg_required_else_help = true,
        about = "Print the field map of one type"
    )]
    Schema {
        #[arg(value_name = "TYPE", help = "Type name, e.g. Chat")]
        type_name: String,
    },
    #[command(
        arg_required_else_help = true,
        about = "Build objects from a JSON payload (stdin or --file)"
    )]
    Decode {
        #[arg(value_name = "TYPE", help = "Type name, e.g. Message")]
        type_name: String,
        #[arg(long, help = "Payload is a JSON array of objects")]
        many: bool,
        #[arg(long, value_hint = ValueHint::FilePath, help = "Read the payload from a file instead of stdin")]
        file: Option<PathBuf>,
        #[arg(long, help = "Print fields under domain (lowerCamelCase) names")]
        domain: bool,
    },
    #[command(
        arg_required_else_help = true,
        about = "Invoke a remote method and build its result"
    )]
    Call {
        #[arg(help = "Remote method name, e.g. getChat")]
        method: String,
        #[arg(value_name = "TYPE", help = "Type of the result, e.g. Chat")]
        type_name: String,
        #[arg(long, help = "Result is a JSON array of objects")]
        many: bool,
        #[arg(long, value_name = "JSON", help = "Method arguments as a JSON object")]
        args: Option<String>,
        #[arg(long, help = "Print fields under domain (lowerCamelCase) names")]
        domain: bool,
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

#[derive(clap::Args)]
struct ConnectionArgs {
    #[arg(long, help = "Bot token (overrides BOTSCHEMA_TOKEN)")]
    token: Option<String>,
    #[arg(long, value_name = "URL", help = "API base URL (overrides BOTSCHEMA_API_URL)")]
    api_url: Option<String>,
    #[arg(long, value_name = "MS", help = "Request timeout in milliseconds")]
    timeout_ms: Option<u64>,
}

impl ConnectionArgs {
    /// Flags win over the environment.
    fn resolve(self) -> Result<ApiConfig, Error> {
        let token = self.token;
        let api_url = self.api_url;
        let timeout_ms = self.timeout_ms;
        let mut config = ApiConfig::from_lookup(|name| match name {
            TOKEN_ENV => token.clone().or_else(|| std::env::var(name).ok()),
            API_URL_ENV => api_url.clone().or_else(|| std::env::var(name).ok()),
            TIMEOUT_ENV if timeout_ms.is_some() => None,
            _ => std::env::var(name).ok(),
        })?;
        if let Some(ms) = timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(file: Option<&Path>) -> Result<Value, Error> {
    let (text, label) = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message(format!("failed to read {}", path.display()))
                    .with_hint("Check that the file exists and is readable.")
                    .with_source(err)
            })?;
            (text, path.display().to_string())
        }
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            (text, "stdin".to_string())
        }
    };
    parse_json(&text, &label)
}

fn parse_json(text: &str, label: &str) -> Result<Value, Error> {
    serde_json::from_str(text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid json in {label}"))
            .with_hint("Provide a single JSON document.")
            .with_source(err)
    })
}

fn decode_json(
    registry: &Registry,
    type_name: &str,
    raw: &Value,
    many: bool,
    domain: bool,
) -> Result<Value, Error> {
    let render = |object: &Object| {
        if domain {
            object.to_domain_json()
        } else {
            object.to_protocol_json()
        }
    };
    if many {
        let objects = registry.build_many(type_name, raw)?;
        Ok(Value::Array(objects.iter().map(render).collect()))
    } else {
        Ok(render(&registry.build(type_name, raw)?))
    }
}

fn types_json(registry: &Registry) -> Value {
    let types: Vec<Value> = registry
        .descriptors()
        .map(|descriptor| {
            json!({
                "name": descriptor.name,
                "fields": descriptor.fields.len(),
                "required": descriptor.required,
            })
        })
        .collect();
    json!({ "types": types })
}

fn schema_json(descriptor: &TypeDescriptor) -> Value {
    let fields: Vec<Value> = descriptor
        .fields
        .iter()
        .map(|field| {
            json!({
                "name": field.name,
                "domain_name": to_domain_name(field.name),
                "kind": field.spec.describe(),
                "required": descriptor.is_required(field.name),
                "nullable": field.spec.allows_null(),
            })
        })
        .collect();
    json!({ "name": descriptor.name, "fields": fields })
}

fn emit_json(value: &Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::MissingRequiredField => "missing required field".to_string(),
        ErrorKind::TypeMismatch => "field has the wrong type".to_string(),
        ErrorKind::NestedBuildFailure => "nested object failed to build".to_string(),
        ErrorKind::ShapeMismatch => "payload has the wrong shape".to_string(),
        ErrorKind::Remote => "remote call failed".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(type_name) = err.type_name() {
        inner.insert("type".to_string(), json!(type_name));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(expected) = err.expected() {
        inner.insert("expected".to_string(), json!(expected));
    }
    if let Some(actual) = err.actual() {
        inner.insert("actual".to_string(), json!(actual));
    }
    if let Some(index) = err.index() {
        inner.insert("index".to_string(), json!(index));
    }
    if let Some(status) = err.status() {
        inner.insert("status".to_string(), json!(status));
    }
    let root = err.root_cause();
    if !std::ptr::eq(root, err) {
        inner.insert("root_cause".to_string(), error_json_root(root));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_json_root(root: &Error) -> Value {
    json!({
        "kind": format!("{:?}", root.kind()),
        "type": root.type_name(),
        "field": root.field(),
    })
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
