// UI layer: renders listings, assembly, and process output, and owns the
// one interactive prompt (`dialoguer`). Rendering goes through `Printer`
// over any writer so the formatting rules are testable; color is applied
// only when the destination is a terminal.

use std::fmt::Display;
use std::io::{self, Write};

use anyhow::Result;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use dialoguer::Input;

use crate::api::{AsmLine, Compiler, CompileResult, Language, TextLine};
use crate::resolve::Chooser;

/// An `id - name` pair shown by the listing commands.
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl From<Language> for CatalogEntry {
    fn from(lang: Language) -> CatalogEntry {
        CatalogEntry {
            id: lang.id,
            name: lang.name,
        }
    }
}

impl From<Compiler> for CatalogEntry {
    fn from(compiler: Compiler) -> CatalogEntry {
        CatalogEntry {
            id: compiler.id,
            name: compiler.name,
        }
    }
}

/// Writes formatted results to a destination, coloring when asked to.
pub struct Printer<W> {
    out: W,
    color: bool,
}

impl Printer<io::Stdout> {
    /// Printer on stdout, colored when stdout is a terminal.
    pub fn stdout() -> Printer<io::Stdout> {
        let out = io::stdout();
        let color = out.is_tty();
        Printer { out, color }
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, color: bool) -> Printer<W> {
        Printer { out, color }
    }

    /// Print `id - name` pairs sorted ascending by id, whatever order the
    /// service returned them in.
    pub fn catalog(&mut self, mut entries: Vec<CatalogEntry>) -> io::Result<()> {
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        for entry in &entries {
            let id = self.green(&entry.id);
            writeln!(self.out, "{} - {}", id, entry.name)?;
        }
        Ok(())
    }

    /// Print a fully highlighted informational line.
    pub fn info(&mut self, message: &str) -> io::Result<()> {
        let message = self.yellow(message);
        writeln!(self.out, "{message}")
    }

    /// Print a highlighted label followed by a plain value.
    pub fn note(&mut self, label: &str, value: impl Display) -> io::Result<()> {
        let label = self.yellow(&format!("{label}:"));
        writeln!(self.out, "{label} {value}")
    }

    /// Print the assembly listing. In compare mode, echo the trimmed
    /// source line (prefixed by its 1-indexed number) before each assembly
    /// line whose mapped line differs from the previous one printed.
    pub fn asm(&mut self, asm: &[AsmLine], source: &str, compare: bool) -> io::Result<()> {
        if !compare {
            for entry in asm {
                writeln!(self.out, "{}", entry.text)?;
            }
            return Ok(());
        }

        let lines: Vec<&str> = source.split('\n').collect();
        let mut prev = 0;

        for entry in asm {
            if let Some(line) = entry.source.as_ref().and_then(|source| source.line) {
                if line > 0 && line != prev {
                    let code = lines.get(line - 1).map(|code| code.trim()).unwrap_or("");
                    let code = self.green(code);
                    writeln!(self.out, "{line} {code}")?;
                    prev = line;
                }
            }
            writeln!(self.out, "{}", entry.text)?;
        }
        Ok(())
    }

    /// Print stdout/stderr of every stage that produced output. With
    /// execution there are up to three stages (assembly compiler, build
    /// compiler, the program itself); verbose labels each stage and its
    /// return code, non-verbose concatenates the streams in stage order.
    pub fn outputs(
        &mut self,
        result: &CompileResult,
        execute: bool,
        verbose: bool,
    ) -> io::Result<()> {
        let exec = if execute { result.exec_result.as_ref() } else { None };

        let Some(exec) = exec else {
            self.streams(&refs(&result.stdout), &refs(&result.stderr))?;
            if verbose {
                self.note("Compiler returned", result.code)?;
            }
            return Ok(());
        };

        let build = &exec.build_result;

        if verbose {
            self.streams(&refs(&result.stdout), &refs(&result.stderr))?;
            self.note("ASM generation compiler returned", result.code)?;

            self.streams(&refs(&build.stdout), &refs(&build.stderr))?;
            self.note("Execution build compiler returned", build.code)?;

            if exec.did_execute {
                self.streams(&refs(&exec.stdout), &refs(&exec.stderr))?;
                self.note("Program returned", exec.code)?;
            }
        } else {
            let mut stdout = refs(&result.stdout);
            let mut stderr = refs(&result.stderr);
            stdout.extend(&build.stdout);
            stderr.extend(&build.stderr);

            if exec.did_execute {
                stdout.extend(&exec.stdout);
                stderr.extend(&exec.stderr);
            }

            self.streams(&stdout, &stderr)?;
        }
        Ok(())
    }

    fn streams(&mut self, stdout: &[&TextLine], stderr: &[&TextLine]) -> io::Result<()> {
        if !stdout.is_empty() {
            self.info("STDOUT:")?;
            for line in stdout {
                writeln!(self.out, "{}", line.text)?;
            }
        }

        if !stderr.is_empty() {
            self.info("STDERR:")?;
            for line in stderr {
                writeln!(self.out, "{}", line.text)?;
            }
        }
        Ok(())
    }

    fn green(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn yellow(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}

fn refs(lines: &[TextLine]) -> Vec<&TextLine> {
    lines.iter().collect()
}

/// Interactive chooser: lists the candidate languages and reads one line
/// from the operator, unvalidated.
pub struct PromptChooser;

impl Chooser for PromptChooser {
    fn choose(&mut self, ext: &str, candidates: &[Language]) -> Result<String> {
        println!("Default compilers for {ext} extension:\n");

        for lang in candidates {
            println!("{} - {}", lang.default_compiler.as_str().green(), lang.name);
        }
        println!();

        let choice: String = Input::new()
            .with_prompt("Choose one compiler")
            .interact_text()?;
        Ok(choice)
    }
}
