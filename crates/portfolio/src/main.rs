
#[macro_use]
extern crate tracing;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use render_page::{load_site, render_page, DirSource, LoadError, RenderError};
use runtime::args::{parse_flag_optional_bool, Arg, ArgError, Args};
use runtime::log::LoggerError;
use runtime::utils::format_error_disp;

const USAGE: &str = "\
Usage: portfolio [-root=DIR] [-template=PATH] [-output=PATH]

Renders the portfolio page from DIR/config/{profile,publications,news}.json.

  -root=DIR        site directory (default: .)
  -template=PATH   page template (default: DIR/index.html)
  -output=PATH     write the page here instead of stdout
  -help            show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    root: PathBuf,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl Options {
    fn template_path(&self) -> PathBuf {
        self.template.clone().unwrap_or_else(|| self.root.join("index.html"))
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Could not set up logging")]
    Logger(#[from] LoggerError),
    #[error("Could not load site content")]
    Load(#[from] LoadError),
    #[error("Could not read page template")]
    Template(#[source] std::io::Error),
    #[error("Could not render page")]
    Render(#[from] RenderError),
    #[error("Could not write rendered page")]
    Write(#[source] std::io::Error),
}

/// `Ok(None)` when help was requested.
fn parse_options(args: impl Iterator<Item = String>) -> Result<Option<Options>, ArgError> {
    let mut options = Options {
        root: PathBuf::from("."),
        template: None,
        output: None,
    };

    // argv[0] is the program name
    let mut args = Args::new(args.skip(1));
    while let Some(arg) = args.next() {
        let (name, value) = match arg {
            Arg::Flag { name, value } => (name, value),
            Arg::Positional(arg) => return Err(ArgError::UnexpectedArg(arg)),
        };
        match name.as_str() {
            "root" => options.root = args.param(&name, value)?.into(),
            "template" => options.template = Some(args.param(&name, value)?.into()),
            "output" | "o" => options.output = Some(args.param(&name, value)?.into()),
            "help" | "h" => {
                if parse_flag_optional_bool(value.as_deref())? {
                    println!("{}", USAGE);
                    return Ok(None);
                }
            },
            _ => return Err(ArgError::UnknownFlag(name)),
        }
    }

    Ok(Some(options))
}

#[tracing::instrument(skip_all, fields(root = %options.root.display()))]
fn run(options: &Options, year: i32) -> Result<(), CliError> {
    let site = load_site(&DirSource::new(&options.root))?;

    let template_path = options.template_path();
    let template = fs_err::read_to_string(&template_path).map_err(CliError::Template)?;

    let page = render_page(&template, &site, year)?;

    match &options.output {
        Some(path) => {
            fs_err::write(path, &page).map_err(CliError::Write)?;
            info!("wrote {} bytes to {}", page.len(), path.display());
        },
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(page.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(CliError::Write)?;
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let options = match parse_options(std::env::args()) {
        Ok(Some(options)) => options,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        },
    };

    if let Err(e) = runtime::log::setup_logger("portfolio").map_err(CliError::from) {
        eprintln!("{}", format_error_disp(&e));
        return ExitCode::FAILURE;
    }

    match run(&options, runtime::utils::current_year()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", format_error_disp(&e));
            ExitCode::FAILURE
        },
    }
}
