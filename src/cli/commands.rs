//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use typesys_core::lang::containers;
use typesys_syntax::signature::{self, TypeDescriptor};

use super::{CliError, CliResult, ExitCode, ParseOptions};
use crate::config::ParserConfig;
use crate::database::{Registry, TypeDatabase};
use crate::diagnostics::{self, TypesystemError};
use crate::model::{TypeEntry, TypeEntryKind};

// ============================================================================
// Shared setup
// ============================================================================

/// Search paths: `-I` directories first, then the document's own directory.
fn parser_config(file: &Path, options: &ParseOptions) -> ParserConfig {
    let mut config = ParserConfig::new();
    for dir in &options.typesystem_paths {
        config = config.with_typesystem_path(dir);
    }
    if let Some(dir) = file.parent() {
        config = config.with_typesystem_path(dir).with_import_fallback_dir(dir);
    }
    if let Some(version) = options.api_version {
        config = config.with_api_version(version);
    }
    config
}

fn read_source(file: &Path) -> CliResult<String> {
    fs::read_to_string(file).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file.display(), e)))
}

/// Parse `file` into a fresh database.
fn load(file: &Path, options: &ParseOptions) -> Result<TypeDatabase, (String, TypesystemError)> {
    let mut db = TypeDatabase::with_config(parser_config(file, options));
    let source = fs::read_to_string(file).unwrap_or_default();
    match db.parse_path(file, !options.no_generate) {
        Ok(()) => Ok(db),
        Err(err) => Err((source, err)),
    }
}

/// Source text of the document an error points into.
fn source_for(error: &TypesystemError, file: &Path, source: String) -> String {
    match error {
        TypesystemError::Located { file: located, .. } if Path::new(located) != file => {
            fs::read_to_string(located).unwrap_or_default()
        }
        _ => source,
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Parse a document and report its warnings.
pub fn check_file(file: &Path, options: &ParseOptions, deny_warnings: bool) -> CliResult<ExitCode> {
    read_source(file)?;
    let db = match load(file, options) {
        Ok(db) => db,
        Err((source, err)) => {
            let source = source_for(&err, file, source);
            diagnostics::print_error(&file.display().to_string(), &source, &err);
            return Err(CliError::failure(""));
        }
    };

    let warnings = db.warnings();
    for warning in &warnings {
        println!("warning: {warning}");
    }
    if deny_warnings && !warnings.is_empty() {
        return Err(CliError::with_code(
            format!("{} warning(s) reported", warnings.len()),
            ExitCode::WARNINGS.0,
        ));
    }
    println!(
        "✓ {}: {} entries, {} warning(s)",
        file.display(),
        db.entries().len(),
        warnings.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// List registered entries as a table or as JSON.
pub fn dump_file(file: &Path, options: &ParseOptions, as_json: bool) -> CliResult<ExitCode> {
    read_source(file)?;
    let db = match load(file, options) {
        Ok(db) => db,
        Err((source, err)) => {
            let source = source_for(&err, file, source);
            return Err(CliError::failure(
                diagnostics::format_error(&source, &err).trim_end().to_string(),
            ));
        }
    };

    if as_json {
        let text = serde_json::to_string_pretty(&database_json(&db))
            .map_err(|e| CliError::failure(format!("Error serializing entries: {}", e)))?;
        println!("{text}");
        return Ok(ExitCode::SUCCESS);
    }

    for entry in db.entries() {
        println!("{:<10} {}", entry.kind_name(), entry.name);
    }
    if !db.global_user_functions().is_empty() {
        println!();
        for function in db.global_user_functions() {
            println!("{:<10} {}", "global", function.signature);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Show the descriptor of a function signature.
pub fn show_signature(sig: &str, return_type: &str) -> CliResult<ExitCode> {
    let normalized = signature::normalized_signature(sig);
    let function = signature::parse_function(&normalized, return_type, 0.0)
        .map_err(|e| CliError::failure(format!("signature error: {e}")))?;

    println!("name:        {}", function.name);
    println!("normalized:  {normalized}");
    println!("returns:     {}", function.return_type.cpp_signature());
    if function.is_const {
        println!("const:       yes");
    }
    for (i, argument) in function.arguments.iter().enumerate() {
        let name = argument.parameter_name.as_deref().unwrap_or("-");
        match argument.default_value.as_deref() {
            Some(default) => println!("arg {}:       {} {name} = {default}", i + 1, argument.cpp_signature()),
            None => println!("arg {}:       {} {name}", i + 1, argument.cpp_signature()),
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// JSON rendering
// ============================================================================

fn database_json(db: &TypeDatabase) -> Value {
    json!({
        "entries": db.entries().iter().map(|e| entry_json(db, e)).collect::<Vec<_>>(),
        "templates": db.templates().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        "rejections": db.rejections().iter().map(|r| json!({
            "class": r.class,
            "function-name": r.function_name,
            "field-name": r.field_name,
            "enum-name": r.enum_name,
        })).collect::<Vec<_>>(),
        "global-functions": db.global_user_functions().iter().map(|f| f.signature.as_str()).collect::<Vec<_>>(),
        "global-fields": db.global_user_fields().iter().map(|f| json!({
            "name": f.name,
            "type": f.type_signature(),
        })).collect::<Vec<_>>(),
        "required-imports": db.required_target_imports(),
        "warnings": db.warnings().into_iter().map(|w| w.message).collect::<Vec<_>>(),
    })
}

fn entry_json(db: &TypeDatabase, entry: &TypeEntry) -> Value {
    let mut value = json!({
        "name": entry.name,
        "kind": entry.kind_name(),
        "since": entry.since,
        "generation": format!("{:?}", entry.code_generation),
        "target-lang-name": entry.target_lang_name(),
        "code-snips": entry.code_snips(db.config()).count(),
        "doc-modifications": entry.doc_modifications.len(),
    });
    let extra = match &entry.kind {
        TypeEntryKind::Container(c) => json!({ "container": containers::as_str(c.kind) }),
        TypeEntryKind::Enum(e) => json!({
            "flags": e.flags.and_then(|id| db.entry(id)).map(|f| f.name.as_str()),
            "rejected-values": e.rejected_values,
        }),
        TypeEntryKind::Function { signatures } => json!({ "signatures": signatures }),
        _ => match entry.complex() {
            Some(c) => json!({
                "package": c.package,
                "added-functions": c.added_functions.iter().map(|f| f.signature.as_str()).collect::<Vec<_>>(),
                "function-modifications": c.function_mods.iter().map(|m| m.signature.as_str()).collect::<Vec<_>>(),
                "field-modifications": c.field_mods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
                "added-fields": c.added_fields.iter().map(|f| json!({
                    "name": f.name,
                    "type": type_json(&f.field_type),
                })).collect::<Vec<_>>(),
            }),
            None => Value::Null,
        },
    };
    if let (Value::Object(target), Value::Object(extra)) = (&mut value, extra) {
        target.extend(extra);
    }
    value
}

fn type_json(descriptor: &TypeDescriptor) -> Value {
    json!({
        "name": descriptor.name,
        "const": descriptor.is_const,
        "reference": descriptor.is_reference,
        "indirections": descriptor.indirections,
    })
}
