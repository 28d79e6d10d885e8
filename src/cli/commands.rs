//! CLI command implementations
//!
//! Every command boots the same way: load config, set the log level, load
//! and register the catalog. Any failure there is fatal. Once booted, a bad
//! request is answered with an error response and never ends the process.
//!
//! Request shape (one JSON object):
//!
//! ```json
//! { "resource": "shows", "url": "/shows?filter=year%20gt%202000&sort=-rating" }
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::catalog::{Catalog, LimitDefaults};
use crate::config::Config;
use crate::endpoint::{ErrorClass, ListParams, QueryError};
use crate::executor::RowSource;
use crate::observability::{log_event_with_fields, Event, Logger};

use super::args::Command;
use super::errors::CliResult;
use super::io::{read_request, read_requests, write_error, write_response};

/// A list request read from stdin
#[derive(Debug, Clone, Deserialize)]
pub struct ListRequest {
    pub resource: String,
    /// Request path and query, resolved against the configured base URL
    pub url: String,
}

/// What to do with a resolved request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Execute,
    Explain,
}

/// Failure of one request; answered, never fatal
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Unknown resource '{0}'")]
    UnknownResource(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RequestError {
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::Invalid(_) => "LIST_INVALID_REQUEST",
            RequestError::UnknownResource(_) => "LIST_UNKNOWN_RESOURCE",
            RequestError::Query(e) => e.code(),
            RequestError::Encode(_) => "LIST_RESPONSE_ENCODING",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            RequestError::Invalid(_) => ErrorClass::BadRequest.as_str(),
            RequestError::UnknownResource(_) => "not_found",
            RequestError::Query(e) => e.class().as_str(),
            RequestError::Encode(_) => ErrorClass::Internal.as_str(),
        }
    }
}

/// A booted catalog ready to answer list requests
pub struct Service {
    catalog: Catalog,
    base: Url,
}

impl Service {
    pub fn new(catalog: Catalog, base: Url) -> Self {
        Self { catalog, base }
    }

    /// Loads config and catalog
    pub fn boot(config_path: &Path) -> CliResult<Self> {
        let config = Config::load(config_path)?;
        Logger::set_min_severity(config.severity()?);

        let catalog_path = config.catalog.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("base_url", config.base_url.as_str()),
                ("catalog", catalog_path.as_str()),
                ("log_level", config.log_level.as_str()),
            ],
        );

        let limits = LimitDefaults {
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        };
        let catalog = Catalog::load(&config.catalog, limits)?;
        Ok(Self::new(catalog, config.base()?))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Answers one request
    pub fn handle(&self, request: &Value, mode: Mode) -> Result<Value, RequestError> {
        let request: ListRequest = serde_json::from_value(request.clone())
            .map_err(|e| RequestError::Invalid(e.to_string()))?;

        let result = self.resolve_and_run(&request, mode);
        if let Err(e) = &result {
            let message = e.to_string();
            Logger::warn(
                Event::ListQueryRejected.as_str(),
                &[
                    ("class", e.class()),
                    ("code", e.code()),
                    ("message", message.as_str()),
                    ("resource", request.resource.as_str()),
                ],
            );
        }
        result
    }

    fn resolve_and_run(&self, request: &ListRequest, mode: Mode) -> Result<Value, RequestError> {
        let resource = self
            .catalog
            .get(&request.resource)
            .ok_or_else(|| RequestError::UnknownResource(request.resource.clone()))?;
        let url = self
            .base
            .join(&request.url)
            .map_err(|e| RequestError::Invalid(format!("url '{}': {}", request.url, e)))?;

        let params = ListParams::from_url(&url)?;
        let query = resource.endpoint.resolve(&params)?;
        let explain = query.explain();

        let response = match mode {
            Mode::Explain => serde_json::to_value(&explain)?,
            Mode::Execute => {
                let rows = resource.table.fetch(&query);
                let page = resource.endpoint.page(rows, &url, &query)?;
                serde_json::to_value(&page)?
            }
        };

        let predicate = explain.predicate.unwrap_or_default();
        let order_by = explain.order_by.join(", ");
        let limit = explain.limit.to_string();
        Logger::trace(
            Event::ListQueryResolved.as_str(),
            &[
                ("limit", limit.as_str()),
                ("order_by", order_by.as_str()),
                ("predicate", predicate.as_str()),
                ("resource", request.resource.as_str()),
            ],
        );
        Ok(response)
    }

    /// Writes the answer to one request as a response line
    pub fn respond<W: Write>(&self, out: &mut W, request: &Value, mode: Mode) -> CliResult<()> {
        match self.handle(request, mode) {
            Ok(data) => write_response(out, data),
            Err(e) => write_error(out, e.code(), e.class(), &e.to_string()),
        }
    }

    /// Answers newline-delimited requests until EOF; returns how many
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, out: &mut W) -> CliResult<usize> {
        let mut served = 0;
        for item in read_requests(reader) {
            match item? {
                Ok(request) => self.respond(out, &request, Mode::Execute)?,
                Err(e) => {
                    let err = RequestError::Invalid(e.to_string());
                    let message = err.to_string();
                    Logger::warn(
                        Event::RequestInvalid.as_str(),
                        &[("code", err.code()), ("message", message.as_str())],
                    );
                    write_error(out, err.code(), err.class(), &message)?;
                }
            }
            served += 1;
        }
        Ok(served)
    }
}

/// Dispatch a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start { config } => start(&config),
        Command::Query { config } => query(&config),
        Command::Explain { config } => explain(&config),
    }
}

/// Boot, then serve stdin until EOF
pub fn start(config_path: &Path) -> CliResult<()> {
    let service = boot_or_log(config_path)?;
    let resources = service.catalog().len().to_string();
    log_event_with_fields(Event::ServeStart, &[("resources", resources.as_str())]);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let served = service.serve(stdin.lock(), &mut stdout)?.to_string();

    log_event_with_fields(Event::ServeComplete, &[("requests", served.as_str())]);
    Ok(())
}

/// Boot, answer one request from stdin, exit
pub fn query(config_path: &Path) -> CliResult<()> {
    one_shot(config_path, Mode::Execute)
}

/// Boot, explain one request from stdin, exit
pub fn explain(config_path: &Path) -> CliResult<()> {
    one_shot(config_path, Mode::Explain)
}

fn one_shot(config_path: &Path, mode: Mode) -> CliResult<()> {
    let service = boot_or_log(config_path)?;
    let request = read_request()?;
    service.respond(&mut io::stdout(), &request, mode)
}

fn boot_or_log(config_path: &Path) -> CliResult<Service> {
    Service::boot(config_path).map_err(|e| {
        log_event_with_fields(
            Event::StartupFailed,
            &[("code", e.code_str()), ("message", e.message())],
        );
        e
    })
}
