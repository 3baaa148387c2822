// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement one invocation.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with the Compiler Explorer
//   endpoints (listings, compile, shortener) and the error taxonomy.
// - `resolve`: Picks a default compiler from a language id or a file
//   extension, behind injectable seams for the language list and the
//   interactive choice.
// - `cli`: The flag surface and the per-invocation control flow.
// - `ui`: Renders listings, assembly, and process output, and owns the
//   interactive prompt.
//
// Keeping this separation makes it possible to test resolution, payload
// construction, and rendering without touching the network.
pub mod api;
pub mod cli;
pub mod resolve;
pub mod ui;
