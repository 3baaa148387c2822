// Command-line surface and per-invocation control flow. Parsing is a
// clap derive struct; `run` performs at most four network calls in a
// fixed order (languages, compilers, compile, shortener) with no retries
// and no state beyond the constructed client.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{ApiClient, ApiError, CompileJob, DEFAULT_HOST};
use crate::resolve;
use crate::ui::{CatalogEntry, Printer, PromptChooser};

#[derive(Parser, Debug)]
#[command(name = "gbolt", version, about = "Command-line tool to interact with Compiler Explorer")]
pub struct Cli {
    /// Compiler Explorer host
    #[arg(short = 'H', long, value_name = "URL", default_value = DEFAULT_HOST)]
    pub host: String,

    /// List the available languages
    #[arg(long)]
    pub list_langs: bool,

    /// List the available compilers, optionally for a single language
    #[arg(long, value_name = "LANG")]
    pub list_compilers: Option<Option<String>>,

    /// Compiler to use
    #[arg(short, long, value_name = "COMPILER")]
    pub compiler: Option<String>,

    /// Language of the source code
    #[arg(short, long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Compiler flags
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub cflags: Option<String>,

    /// Command-line arguments for the executed program
    #[arg(short, long, value_name = "ARGV", num_args = 1..)]
    pub args: Vec<String>,

    /// Lines fed to the executed program on standard input
    #[arg(long, value_name = "LINE", num_args = 1..)]
    pub stdin: Vec<String>,

    /// Execute the code
    #[arg(short, long = "exec")]
    pub exec: bool,

    /// Don't show the generated assembly
    #[arg(short, long)]
    pub skip_asm: bool,

    /// Interleave source lines with the generated assembly
    #[arg(short = 'C', long)]
    pub compare: bool,

    /// Generate a link for the compilation state
    #[arg(short = 'L', long)]
    pub link: bool,

    /// Show additional details
    #[arg(short, long)]
    pub verbose: bool,

    /// File containing the source code
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// One CLI invocation, parsed flags to rendered output.
pub fn run(cli: Cli) -> Result<()> {
    let api = ApiClient::new(&cli.host)?;
    let mut printer = Printer::stdout();

    if cli.list_langs {
        let langs = api
            .languages(&["id", "name"])
            .context("Could not list the available languages")?;
        printer.catalog(langs.into_iter().map(CatalogEntry::from).collect())?;
        return Ok(());
    }

    if let Some(filter) = &cli.list_compilers {
        let compilers = api
            .compilers(filter.as_deref(), &["id", "name"])
            .context("Could not list the available compilers")?;
        printer.catalog(compilers.into_iter().map(CatalogEntry::from).collect())?;
        return Ok(());
    }

    let Some(path) = &cli.file else {
        bail!("No input file");
    };

    let compiler = match &cli.compiler {
        Some(compiler) => compiler.clone(),
        None => {
            let resolved = match &cli.lang {
                Some(lang) => resolve::default_for_language(&api, lang)?,
                None => resolve::default_for_file(&api, path, &mut PromptChooser)?,
            };
            resolved.ok_or_else(|| anyhow!("Could not determine the default compiler"))?
        }
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;

    let job = CompileJob {
        source,
        compiler,
        language: cli.lang.clone(),
        cflags: cli.cflags.clone(),
        args: cli.args.clone(),
        stdin: (!cli.stdin.is_empty()).then(|| cli.stdin.join("\n")),
    };

    let spinner = request_spinner("Compiling...");
    let outcome = api.compile(&job, cli.skip_asm, cli.exec);
    spinner.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(ApiError::NotFound) => bail!("Compiler {} not found", job.compiler),
        Err(error) => {
            log::debug!("compile failed: {error:?}");
            bail!("Failed to compile");
        }
    };

    if cli.verbose {
        printer.info(&format!("Using the {} compiler", job.compiler))?;
        printer.note("Compilation options", result.compilation_options.join(" "))?;
    }

    if cli.link {
        let spinner = request_spinner("Saving...");
        let outcome = api.shorten(&job, cli.exec);
        spinner.finish_and_clear();

        let link = outcome.map_err(|error| {
            log::debug!("shortener failed: {error:?}");
            anyhow!("Cannot generate the link")
        })?;
        printer.note("URL", &link.url)?;
    }

    if !cli.skip_asm {
        printer.asm(&result.asm, &job.source, cli.compare)?;
    }

    printer.outputs(&result, cli.exec, cli.verbose)?;
    Ok(())
}

fn request_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
