//! `genz`: load an HTML page, bind its attributes, replay interactions and
//! print the resulting document and store.
//!
//! Usage: `genz [OPTIONS] <FILE>`
//! Example: genz page.html --step click:#inc --step input:#name=Ada --state
//!
//! Set RUST_LOG=genz=debug to see wiring and selector misses.

mod script;

use anyhow::{Context as _, Result, anyhow};
use clap::Parser;
use genz::{Genz, GenzConfig, RecordingHost, Value};
use html::{DOMSubscriber, DOMUpdate, Document, FormState};
use log::info;
use script::{Step, load_script};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

/// Run Gen-Z attribute bindings against an HTML file.
#[derive(Parser, Debug)]
#[command(name = "genz", version)]
#[command(after_help = r#"Steps:
  click:<selector>           click the first matching element
  input:<selector>=<text>    replace its value and fire input
  check:<selector>           check a checkbox and fire input
  uncheck:<selector>         uncheck a checkbox and fire input
  enter:<selector>           pointer enters the element
  leave:<selector>           pointer leaves the element

Script steps run before --step steps.

Environment variables:
  GENZ_BINDING_INDEX=1       resolve bindings through an index
  GENZ_LEGACY_SELECTORS=0    disable #id/.class references in getz/setz"#)]
struct Args {
    /// HTML file to load
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Interaction to replay, in order (repeatable)
    #[arg(long = "step", value_name = "STEP")]
    steps: Vec<Step>,

    /// JSON file with an array of steps
    #[arg(long, value_name = "JSON")]
    script: Option<PathBuf>,

    /// Initial store variable set before binding (repeatable), e.g. count=0
    #[arg(long = "set", value_name = "NAME=JSON")]
    vars: Vec<String>,

    /// Print the store as JSON
    #[arg(long)]
    state: bool,

    /// Do not print the document
    #[arg(long)]
    no_html: bool,

    /// Print live form values and checked states in the markup
    #[arg(long)]
    live: bool,

    /// Print every DOM mutation as it happens
    #[arg(long)]
    trace: bool,

    /// Use the binding index regardless of GENZ_BINDING_INDEX
    #[arg(long)]
    index: bool,
}

/// Collects one line per mutation until `run` writes them out.
#[derive(Clone, Default)]
struct TraceLog {
    lines: Rc<RefCell<Vec<String>>>,
}

impl TraceLog {
    fn drain_into(&self, out: &mut impl Write) -> Result<()> {
        for line in self.lines.borrow_mut().drain(..) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

impl DOMSubscriber for TraceLog {
    fn apply_update(&mut self, update: &DOMUpdate) -> Result<()> {
        self.lines.borrow_mut().push(format!("update: {update:?}"));
        Ok(())
    }
}

/// Parse `name=json`; text that is not JSON is taken as a string.
fn parse_var(text: &str) -> Result<(String, Value)> {
    let (name, raw) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=JSON, found {text:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("empty variable name in {text:?}"));
    }
    let value = serde_json::from_str(raw)
        .map_or_else(|_| Value::from(raw), Value::from_json);
    Ok((name.to_owned(), value))
}

fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut document = Document::parse(&source)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let trace = TraceLog::default();
    if args.trace {
        document.subscribe(Box::new(trace.clone()));
    }

    let mut steps = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };
    steps.extend(args.steps.iter().cloned());

    let mut config = GenzConfig::from_env();
    config.binding_index |= args.index;

    let mut genz = Genz::with_host(document, config, RecordingHost::default());
    for var in &args.vars {
        let (name, value) = parse_var(var)?;
        genz.set(&name, value);
    }
    genz.initialize();

    for step in &steps {
        step.apply(&mut genz)
            .with_context(|| format!("step {step:?} failed"))?;
    }
    info!("replayed {} steps", steps.len());

    trace.drain_into(out)?;

    for alert in &genz.host().alerts {
        writeln!(out, "alert: {alert}")?;
    }
    for form in &genz.host().submissions {
        let name = genz
            .document()
            .element_id(*form)
            .map_or_else(|| String::from("form"), |id| format!("#{id}"));
        writeln!(out, "submit: {name}")?;
    }
    if !args.no_html {
        let state = if args.live {
            FormState::Live
        } else {
            FormState::Markup
        };
        writeln!(out, "{}", genz.document().to_html(state))?;
    }
    if args.state {
        writeln!(out, "{}", serde_json::to_string_pretty(&genz.store().to_json())?)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(&args, &mut io::stdout().lock())
}
