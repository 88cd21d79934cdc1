// server.rs — MCP server for Warden.
//
// WardenServer implements the rmcp ServerHandler trait, exposing a
// sandboxed slice of the local filesystem as MCP tools. Every path in
// every call goes through the PathValidator before any OS access, and
// expected failures come back as error-flagged tool results rather than
// protocol errors.
//
// Tools:
//   copy_file                — duplicate a file or directory tree
//   move_file                — rename within the sandbox
//   delete_file              — soft delete into the root's Trash
//   create_directory         — idempotent mkdir
//   list_directory           — immediate children, tagged file/directory
//   directory_tree           — recursive structure as JSON
//   search_files             — case-insensitive name search with excludes
//   get_file_info            — size, timestamps, kind, permissions
//   read_multiple_files      — concurrent reads, per-path failures
//   write_file               — create or overwrite one file
//   edit_file                — multi-strategy text edits, fenced diff
//   list_allowed_directories — the sandbox bounds

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use warden_patch::Edit;
use warden_sandbox::{AllowedRoots, PathValidator};
use warden_trash::Quarantine;

use crate::config::ServerConfig;
use crate::error::ServerError;

// ── Tool parameter types ─────────────────────────────────────────

/// Parameters for tools that operate on one path.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PathParams {
    /// Absolute or `~`-prefixed path inside an allowed directory.
    pub path: String,
}

/// Parameters for `copy_file` and `move_file`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SourceDestParams {
    /// Path of the existing item.
    pub source: String,
    /// Where it should end up. Must not already exist.
    pub destination: String,
}

/// Parameters for `search_files`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Directory to search from.
    pub path: String,
    /// Case-insensitive substring to look for in entry names.
    pub pattern: String,
    /// Patterns to skip: a bare name excludes that name anywhere in the
    /// tree, anything with a wildcard is matched as a glob against the
    /// path relative to the search root.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Parameters for `read_multiple_files`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadMultipleParams {
    /// Paths to read. Each reports its own success or failure.
    pub paths: Vec<String>,
}

/// Parameters for `write_file`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteParams {
    /// Path to create or overwrite.
    pub path: String,
    /// Full new content of the file.
    pub content: String,
}

/// One edit within an `edit_file` batch.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditOp {
    /// Text to find. Matched exactly first, then line by line with
    /// whitespace tolerance.
    pub old_text: String,
    /// Text to put in its place.
    pub new_text: String,
}

/// Parameters for `edit_file`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditParams {
    /// File to edit.
    pub path: String,
    /// Edits applied in order. The batch fails as a whole when any edit
    /// does not match, leaving the file untouched.
    pub edits: Vec<EditOp>,
    /// Preview the diff without writing the file.
    #[serde(default)]
    pub dry_run: bool,
}

// ── MCP Server ───────────────────────────────────────────────────

/// The Warden MCP server: the shared sandbox plus the tool router.
///
/// All fields are immutable once constructed, so tool calls can run
/// concurrently without synchronization.
pub struct WardenServer {
    roots: Arc<AllowedRoots>,
    validator: PathValidator,
    quarantine: Quarantine,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WardenServer {
    /// Build the server, resolving and checking every allowed directory.
    ///
    /// Fails when the list is empty or any entry is missing or not a
    /// directory. Callers treat that as fatal.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let roots = Arc::new(AllowedRoots::new(config.allowed_directories)?);
        Ok(Self {
            validator: PathValidator::new(Arc::clone(&roots)),
            quarantine: Quarantine::new(Arc::clone(&roots)),
            roots,
            tool_router: Self::tool_router(),
        })
    }

    /// The resolved sandbox roots.
    pub fn allowed_roots(&self) -> &AllowedRoots {
        &self.roots
    }

    // ── Mutating tools ───────────────────────────────────────

    #[tool(
        description = "Copy a file or directory to a new location inside the sandbox. Directories are copied recursively. Fails if the destination already exists."
    )]
    fn copy_file(
        &self,
        Parameters(params): Parameters<SourceDestParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_copy(params)))
    }

    #[tool(
        description = "Move or rename a file or directory inside the sandbox. Fails if the destination already exists."
    )]
    fn move_file(
        &self,
        Parameters(params): Parameters<SourceDestParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_move(params)))
    }

    #[tool(
        description = "Soft-delete a file or directory: it is moved into a Trash directory under its allowed root instead of being destroyed. A name collision in the trash gets a timestamp suffix, so earlier deletes are never overwritten."
    )]
    fn delete_file(
        &self,
        Parameters(params): Parameters<PathParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_delete(params)))
    }

    #[tool(
        description = "Create a directory. Succeeds silently if it already exists; the parent must already exist."
    )]
    fn create_directory(
        &self,
        Parameters(params): Parameters<PathParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_create_directory(params)))
    }

    #[tool(
        description = "Create a new file or completely overwrite an existing one with the given content."
    )]
    fn write_file(
        &self,
        Parameters(params): Parameters<WriteParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_write(params)))
    }

    #[tool(
        description = "Apply text edits to a file and return a fenced unified diff of the result. Each edit replaces oldText with newText; whitespace-only mismatches fall back to line-by-line matching that keeps the file's own indentation. The batch either fully applies or leaves the file untouched. Set dryRun to preview the diff without writing."
    )]
    fn edit_file(
        &self,
        Parameters(params): Parameters<EditParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_edit(params)))
    }

    // ── Read-only tools ──────────────────────────────────────

    #[tool(
        description = "List the immediate children of a directory, each tagged as file or directory, sorted by name."
    )]
    fn list_directory(
        &self,
        Parameters(params): Parameters<PathParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_list(params)))
    }

    #[tool(
        description = "Return the recursive structure of a directory as JSON. Directory nodes always carry a children array (possibly empty); file nodes never do. Symlinked directories are reported but not followed."
    )]
    fn directory_tree(
        &self,
        Parameters(params): Parameters<PathParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_tree(params)))
    }

    #[tool(
        description = "Recursively find files and directories whose name contains the pattern, case-insensitively. Matches are absolute paths. Entries matching excludePatterns are skipped along with their subtrees."
    )]
    fn search_files(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_search(params)))
    }

    #[tool(
        description = "Get metadata for a file or directory: size, timestamps, kind, and permission bits."
    )]
    fn get_file_info(
        &self,
        Parameters(params): Parameters<PathParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_file_info(params)))
    }

    #[tool(
        description = "Read several files at once. Reads run concurrently and each path reports its own content or failure, so one unreadable file does not fail the rest."
    )]
    async fn read_multiple_files(
        &self,
        Parameters(params): Parameters<ReadMultipleParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut tasks = Vec::with_capacity(params.paths.len());
        for requested in params.paths {
            let validator = self.validator.clone();
            let target = requested.clone();
            let handle = tokio::task::spawn_blocking(move || -> Result<String, ServerError> {
                let validated = validator.validate(&target)?;
                Ok(warden_files::read_file(&validated)?)
            });
            tasks.push((requested, handle));
        }

        let mut sections = Vec::with_capacity(tasks.len());
        for (requested, handle) in tasks {
            let section = match handle.await {
                Ok(Ok(content)) => format!("{requested}:\n{content}"),
                Ok(Err(err)) => {
                    tracing::debug!(path = %requested, error = %err, "read failed");
                    format!("{requested}: Error - {err}")
                }
                Err(err) => {
                    tracing::debug!(path = %requested, error = %err, "read task failed");
                    format!("{requested}: Error - {err}")
                }
            };
            sections.push(section);
        }

        Ok(CallToolResult::success(vec![Content::text(
            sections.join("\n---\n"),
        )]))
    }

    #[tool(
        description = "List the directories this server is allowed to access. Every path in every other tool must resolve inside one of them."
    )]
    fn list_allowed_directories(&self) -> Result<CallToolResult, McpError> {
        Ok(respond(self.try_allowed_directories()))
    }
}

// ── Tool implementations ─────────────────────────────────────────
//
// The `?` failures here are expected conditions; `respond` renders them
// as error-flagged results at the tool boundary.

impl WardenServer {
    fn try_copy(&self, params: SourceDestParams) -> Result<CallToolResult, ServerError> {
        let source = self.validator.validate(&params.source)?;
        let destination = self.validator.validate(&params.destination)?;
        warden_files::copy_path(&source, &destination)?;
        Ok(text_result(format!(
            "Successfully copied {} to {}",
            params.source, params.destination
        )))
    }

    fn try_move(&self, params: SourceDestParams) -> Result<CallToolResult, ServerError> {
        let source = self.validator.validate(&params.source)?;
        let destination = self.validator.validate(&params.destination)?;
        warden_files::move_path(&source, &destination)?;
        Ok(text_result(format!(
            "Successfully moved {} to {}",
            params.source, params.destination
        )))
    }

    fn try_delete(&self, params: PathParams) -> Result<CallToolResult, ServerError> {
        let target = self.validator.validate(&params.path)?;
        let entry = self.quarantine.move_to_trash(&target)?;
        Ok(text_result(format!(
            "Successfully moved {} to trash at {}",
            params.path,
            entry.trashed_to.display()
        )))
    }

    fn try_create_directory(&self, params: PathParams) -> Result<CallToolResult, ServerError> {
        let target = self.validator.validate(&params.path)?;
        warden_files::create_dir(&target)?;
        Ok(text_result(format!(
            "Successfully created directory {}",
            params.path
        )))
    }

    fn try_write(&self, params: WriteParams) -> Result<CallToolResult, ServerError> {
        let target = self.validator.validate(&params.path)?;
        warden_files::write_file(&target, &params.content)?;
        Ok(text_result(format!("Successfully wrote to {}", params.path)))
    }

    fn try_edit(&self, params: EditParams) -> Result<CallToolResult, ServerError> {
        let target = self.validator.validate(&params.path)?;
        let edits: Vec<Edit> = params
            .edits
            .into_iter()
            .map(|op| Edit {
                old_text: op.old_text,
                new_text: op.new_text,
            })
            .collect();
        let result = warden_patch::apply_edits(&target, &edits, params.dry_run)?;
        Ok(text_result(result.fenced))
    }

    fn try_list(&self, params: PathParams) -> Result<CallToolResult, ServerError> {
        let dir = self.validator.validate(&params.path)?;
        let entries = warden_walk::list(&dir)?;
        let count = entries.len();
        json_result(serde_json::json!({ "entries": entries, "count": count }))
    }

    fn try_tree(&self, params: PathParams) -> Result<CallToolResult, ServerError> {
        let dir = self.validator.validate(&params.path)?;
        let nodes = warden_walk::tree(&self.validator, &dir)?;
        json_result(nodes)
    }

    fn try_search(&self, params: SearchParams) -> Result<CallToolResult, ServerError> {
        let start = self.validator.validate(&params.path)?;
        let found = warden_walk::search(
            &self.validator,
            &start,
            &params.pattern,
            &params.exclude_patterns,
        )?;
        let matches: Vec<String> = found
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        let count = matches.len();
        json_result(serde_json::json!({ "matches": matches, "count": count }))
    }

    fn try_file_info(&self, params: PathParams) -> Result<CallToolResult, ServerError> {
        let target = self.validator.validate(&params.path)?;
        let info = warden_files::stat(&target)?;
        json_result(info)
    }

    fn try_allowed_directories(&self) -> Result<CallToolResult, ServerError> {
        let directories: Vec<String> = self
            .roots
            .paths()
            .iter()
            .map(|root| root.display().to_string())
            .collect();
        json_result(serde_json::json!({ "allowedDirectories": directories }))
    }
}

// ── ServerHandler implementation ─────────────────────────────────

#[tool_handler]
impl ServerHandler for WardenServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "warden".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Warden".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Warden sandboxed filesystem server. Every path must sit \
                 inside one of the directories given at startup; symlinks \
                 cannot lead outside them. Deletes are soft and land in a \
                 Trash directory under the item's allowed root. Call \
                 list_allowed_directories to discover the sandbox bounds."
                    .into(),
            ),
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn text_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message.into())])
}

fn json_result(payload: impl serde::Serialize) -> Result<CallToolResult, ServerError> {
    let content = Content::json(payload).map_err(|e| ServerError::Response(e.to_string()))?;
    Ok(CallToolResult::success(vec![content]))
}

/// Render an expected failure as an error-flagged result.
fn respond(outcome: Result<CallToolResult, ServerError>) -> CallToolResult {
    outcome.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "tool call failed");
        CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
    })
}
