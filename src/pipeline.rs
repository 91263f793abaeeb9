//! The compilation pipeline.
//!
//! Two entry points mirror the CLI contract: [`build`] deterministically
//! regenerates every cached artifact (the regex parse table, the Ember
//! lexer DFA, the Ember parse table) and reports whether all grammars
//! are conflict-free; [`compile_source`] loads the caches, rebuilding
//! any that are missing, stale, or shaped wrong, and runs the stages,
//! short-circuiting at the first failing one.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::grammar::{ParseTable, TableError, build_table};
use crate::lexer::{LexError, Lexer, build_lexer};
use crate::parser::Parser;
use crate::regex::{RegexCompiler, regex_grammar};
use crate::semantic::{Context, analyze};
use crate::syntax::{Ast, ember_grammar, ember_rules, ember_terminal_of};

/// Where cached artifacts live. Files are named
/// `<name>_automaton.json` and `<name>_lr.json`.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("cache"),
        }
    }
}

impl CacheConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn automaton_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}_automaton.json"))
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}_lr.json"))
    }
}

/// Infrastructure failures: broken caches that cannot be rebuilt,
/// unwritable cache directories, malformed rule patterns. User-program
/// errors are never surfaced here; they land in [`CompileOutcome`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Lexer(#[from] LexError),

    #[error("{0}")]
    Table(#[from] TableError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The pipeline stage that rejected a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntactic,
    Semantic,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Lexical => "lexical",
            Stage::Syntactic => "syntactic",
            Stage::Semantic => "semantic",
        })
    }
}

/// Outcome of compiling one source text. On success the analyzed AST
/// and the fully resolved context are handed to the code-generation
/// boundary; on failure the first failing stage reports its errors and
/// later stages never ran.
#[derive(Debug)]
pub enum CompileOutcome {
    Success { ast: Ast, context: Context },
    Failure { stage: Stage, errors: Vec<String> },
}

impl CompileOutcome {
    pub fn ok(&self) -> bool {
        matches!(self, CompileOutcome::Success { .. })
    }
}

/// Regenerate every cached artifact. Returns `Ok(false)` when some
/// grammar has an LR conflict (the offending actions are logged);
/// `Err` only for infrastructure failures.
pub fn build(config: &CacheConfig) -> Result<bool, PipelineError> {
    fs::create_dir_all(&config.root)?;

    let regex = regex_grammar();
    let regex_table = match build_table(&regex) {
        Ok(table) => table,
        Err(error @ TableError::Conflict { .. }) => {
            tracing::error!(grammar = "regex", %error, "table generation failed");
            return Ok(false);
        }
        Err(error) => return Err(error.into()),
    };
    regex_table.save_to(&config.table_path("regex"))?;

    let compiler = RegexCompiler::with_table(regex_table)?;
    let lexer = build_lexer(&compiler, ember_rules())?;
    lexer.save_to(&config.automaton_path("ember"))?;

    let ember = ember_grammar();
    match build_table(&ember) {
        Ok(table) => {
            table.save_to(&config.table_path("ember"))?;
        }
        Err(error @ TableError::Conflict { .. }) => {
            tracing::error!(grammar = "ember", %error, "table generation failed");
            return Ok(false);
        }
        Err(error) => return Err(error.into()),
    }

    info!(root = %config.root.display(), "caches rebuilt");
    Ok(true)
}

fn load_or_build_regex_table(config: &CacheConfig) -> Result<ParseTable, PipelineError> {
    let grammar = regex_grammar();
    let path = config.table_path("regex");
    match ParseTable::load_from(&path) {
        Ok(table) if table.validate(&grammar).is_ok() => {
            debug!(grammar = "regex", "table cache hit");
            return Ok(table);
        }
        _ => debug!(grammar = "regex", "table cache miss, rebuilding"),
    }
    let table = build_table(&grammar)?;
    fs::create_dir_all(&config.root)?;
    table.save_to(&path)?;
    Ok(table)
}

fn load_or_build_lexer(config: &CacheConfig) -> Result<Lexer, PipelineError> {
    let path = config.automaton_path("ember");
    match Lexer::load_from(&path) {
        Ok(lexer) => {
            debug!(lexer = "ember", "automaton cache hit");
            return Ok(lexer);
        }
        Err(_) => debug!(lexer = "ember", "automaton cache miss, rebuilding"),
    }
    let compiler = RegexCompiler::with_table(load_or_build_regex_table(config)?)?;
    let lexer = build_lexer(&compiler, ember_rules())?;
    fs::create_dir_all(&config.root)?;
    lexer.save_to(&path)?;
    Ok(lexer)
}

fn load_or_build_ember_table(
    config: &CacheConfig,
    grammar: &crate::grammar::Grammar<Ast>,
) -> Result<ParseTable, PipelineError> {
    let path = config.table_path("ember");
    match ParseTable::load_from(&path) {
        Ok(table) if table.validate(grammar).is_ok() => {
            debug!(grammar = "ember", "table cache hit");
            return Ok(table);
        }
        _ => debug!(grammar = "ember", "table cache miss, rebuilding"),
    }
    let table = build_table(grammar)?;
    fs::create_dir_all(&config.root)?;
    table.save_to(&path)?;
    Ok(table)
}

/// Run the full front-end over `source`.
pub fn compile_source(source: &str, config: &CacheConfig) -> Result<CompileOutcome, PipelineError> {
    let lexer = load_or_build_lexer(config)?;
    let tokens = match lexer.run(source) {
        Ok(tokens) => tokens,
        Err(error @ LexError::Unrecognized { .. }) => {
            return Ok(CompileOutcome::Failure {
                stage: Stage::Lexical,
                errors: vec![error.to_string()],
            });
        }
        Err(error) => return Err(error.into()),
    };
    info!(tokens = tokens.len(), "lexing finished");

    let grammar = ember_grammar();
    let table = load_or_build_ember_table(config, &grammar)?;
    let parser = Parser::new(&grammar, &table, ember_terminal_of);
    let tree = match parser.parse(&tokens) {
        Ok(tree) => tree,
        Err(error) => {
            return Ok(CompileOutcome::Failure {
                stage: Stage::Syntactic,
                errors: vec![error.to_string()],
            });
        }
    };
    let ast = grammar.evaluate(&tree, &tokens);
    info!("parsing finished");

    let result = analyze(&ast);
    if !result.ok {
        return Ok(CompileOutcome::Failure {
            stage: Stage::Semantic,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        });
    }
    info!("semantic analysis finished");

    Ok(CompileOutcome::Success {
        ast,
        context: result.context,
    })
}
