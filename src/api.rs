// API client module: a small blocking HTTP client for the Compiler
// Explorer REST endpoints. Requests are built fully before dispatch and
// responses are decoded as single JSON documents; every failure surfaces
// as one `ApiError` per exchange, with no retries.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Host used when none is given on the command line.
pub const DEFAULT_HOST: &str = "https://godbolt.org";

/// Everything that can go wrong during one HTTP exchange.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport layer could not complete the exchange (DNS,
    /// connection refused, timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// HTTP 404: the compiler or language id does not exist.
    #[error("compiler or language not found")]
    NotFound,

    /// HTTP 505, which is what the upstream service reports for hard
    /// internal failures.
    #[error("the service reported a server error")]
    Server,

    /// Any other non-success HTTP status.
    #[error("unexpected response status: {0}")]
    Response(StatusCode),

    /// The response body was not valid JSON.
    #[error("could not decode the response as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    fn for_status(status: StatusCode) -> Option<ApiError> {
        match status {
            StatusCode::NOT_FOUND => Some(ApiError::NotFound),
            StatusCode::HTTP_VERSION_NOT_SUPPORTED => Some(ApiError::Server),
            status if !status.is_success() => Some(ApiError::Response(status)),
            _ => None,
        }
    }
}

/// A language known to the service. Listings request a subset of fields
/// per call, so everything defaults when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub name: String,
    pub default_compiler: String,
    pub extensions: Vec<String>,
}

/// A compiler known to the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Compiler {
    pub id: String,
    pub name: String,
}

/// One line of a stdout/stderr stream.
#[derive(Debug, Clone, Deserialize)]
pub struct TextLine {
    pub text: String,
}

/// One emitted assembly line, optionally mapped back to a source line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AsmLine {
    pub text: String,
    pub source: Option<SourceRef>,
}

/// Source location carried by an assembly line. `line` is 1-indexed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceRef {
    pub line: Option<usize>,
}

/// Result of a compile request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileResult {
    pub code: i64,
    pub stdout: Vec<TextLine>,
    pub stderr: Vec<TextLine>,
    pub asm: Vec<AsmLine>,
    pub compilation_options: Vec<String>,
    pub exec_result: Option<ExecResult>,
}

/// Execution stage of a compile request that asked for it.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecResult {
    pub did_execute: bool,
    pub code: i64,
    pub stdout: Vec<TextLine>,
    pub stderr: Vec<TextLine>,
    pub build_result: BuildResult,
}

/// Output of the compiler that built the executable.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildResult {
    pub code: i64,
    pub stdout: Vec<TextLine>,
    pub stderr: Vec<TextLine>,
}

/// Response of the shortener endpoint.
#[derive(Debug, Deserialize)]
pub struct ShortLink {
    pub url: String,
}

/// Inputs of one compilation, built once by the frontend and shared by
/// the compile and shorten operations.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub source: String,
    pub compiler: String,
    pub language: Option<String>,
    pub cflags: Option<String>,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

#[derive(Serialize)]
struct CompileRequest<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<&'a str>,
    options: CompileOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompileOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_arguments: Option<&'a str>,
    compiler_options: CompilerOptions,
    execute_parameters: ExecuteParameters<'a>,
    filters: Filters,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    skip_asm: bool,
}

#[derive(Serialize)]
struct ExecuteParameters<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdin: Option<&'a str>,
}

#[derive(Serialize)]
struct Filters {
    execute: bool,
}

#[derive(Serialize)]
struct ShortenRequest<'a> {
    sessions: Vec<Session<'a>>,
}

#[derive(Serialize)]
struct Session<'a> {
    id: u32,
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    compilers: Vec<SessionCompiler<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    executors: Option<Vec<SessionExecutor<'a>>>,
}

#[derive(Serialize)]
struct SessionCompiler<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a str>,
}

#[derive(Serialize)]
struct SessionExecutor<'a> {
    compiler: SessionCompiler<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arguments: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdin: Option<&'a str>,
}

fn compile_payload<'a>(job: &'a CompileJob, skip_asm: bool, execute: bool) -> CompileRequest<'a> {
    CompileRequest {
        source: &job.source,
        lang: some_str(&job.language),
        options: CompileOptions {
            user_arguments: some_str(&job.cflags),
            compiler_options: CompilerOptions { skip_asm },
            execute_parameters: ExecuteParameters {
                args: some_slice(&job.args),
                stdin: some_str(&job.stdin),
            },
            filters: Filters { execute },
        },
    }
}

fn shorten_payload<'a>(job: &'a CompileJob, execute: bool) -> ShortenRequest<'a> {
    let cflags = some_str(&job.cflags);

    let executors = execute.then(|| {
        vec![SessionExecutor {
            compiler: SessionCompiler {
                id: &job.compiler,
                options: cflags,
            },
            arguments: some_slice(&job.args),
            stdin: some_str(&job.stdin),
        }]
    });

    ShortenRequest {
        sessions: vec![Session {
            id: 1,
            source: &job.source,
            language: some_str(&job.language),
            compilers: vec![SessionCompiler {
                id: &job.compiler,
                options: cflags,
            }],
            executors,
        }],
    }
}

fn some_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn some_slice(value: &[String]) -> Option<&[String]> {
    (!value.is_empty()).then_some(value)
}

fn join_fields(fields: &[&str]) -> Option<String> {
    (!fields.is_empty()).then(|| fields.join(","))
}

/// Compiler Explorer API consumer. Holds a reqwest blocking client and
/// the configured host; constructed once per invocation and passed down
/// explicitly.
pub struct ApiClient {
    client: Client,
    host: String,
}

impl ApiClient {
    /// Create a client for the given host, normalizing it as `set_host`
    /// does.
    pub fn new(host: &str) -> Result<ApiClient, ApiError> {
        let client = Client::builder().build()?;
        let mut api = ApiClient {
            client,
            host: String::new(),
        };
        api.set_host(host);
        Ok(api)
    }

    /// Set the Compiler Explorer host. A host without an `http://` or
    /// `https://` prefix gets `http://` prepended; anything else is left
    /// for the transport layer to reject on first use.
    pub fn set_host(&mut self, host: &str) {
        let lower = host.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            self.host = host.to_string();
        } else {
            self.host = format!("http://{host}");
        }
    }

    /// The currently configured host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// List languages, requesting only the given fields (all of them when
    /// the list is empty).
    pub fn languages(&self, fields: &[&str]) -> Result<Vec<Language>, ApiError> {
        self.get(&self.api_url("languages"), fields)
    }

    /// List compilers, optionally scoped to one language id.
    pub fn compilers(&self, lang: Option<&str>, fields: &[&str]) -> Result<Vec<Compiler>, ApiError> {
        let url = match lang {
            Some(lang) => self.api_url(&format!("compilers/{lang}")),
            None => self.api_url("compilers"),
        };
        self.get(&url, fields)
    }

    /// Compile the job's source with its compiler.
    pub fn compile(
        &self,
        job: &CompileJob,
        skip_asm: bool,
        execute: bool,
    ) -> Result<CompileResult, ApiError> {
        let url = self.api_url(&format!("compiler/{}/compile", job.compiler));
        self.post(&url, &compile_payload(job, skip_asm, execute))
    }

    /// Save the job as a short link and return its URL.
    pub fn shorten(&self, job: &CompileJob, execute: bool) -> Result<ShortLink, ApiError> {
        self.post(&self.api_url("shortener"), &shorten_payload(job, execute))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.host, path)
    }

    fn get<T: DeserializeOwned>(&self, url: &str, fields: &[&str]) -> Result<T, ApiError> {
        log::debug!("GET {url}");
        let mut request = self.client.get(url);
        if let Some(fields) = join_fields(fields) {
            request = request.query(&[("fields", fields)]);
        }
        dispatch(request)
    }

    fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T, ApiError> {
        log::debug!("POST {url}");
        dispatch(self.client.post(url).json(body))
    }
}

fn dispatch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.header(ACCEPT, "application/json").send()?;

    if let Some(error) = ApiError::for_status(response.status()) {
        return Err(error);
    }

    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}
