
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    #[error("Invalid boolean flag: {:?}", .0)]
    InvalidBool(String),
    #[error("Flag -{} is missing an argument", .0)]
    MissingArg(String),
    #[error("Unknown flag -{}", .0)]
    UnknownFlag(String),
    #[error("Unexpected argument: {:?}", .0)]
    UnexpectedArg(String),
}

/// Parse a boolean flag; true is "-c" or "-c=true", false is "-c=false"
pub fn parse_flag_optional_bool(value: Option<&str>) -> Result<bool, ArgError> {
    match value {
        None => Ok(true),
        Some("false" | "no") => Ok(false),
        Some("true" | "yes") => Ok(true),
        Some(s) => Err(ArgError::InvalidBool(s.into())),
    }
}

/// One command-line argument. Flags are single-dash: `-flag` or
/// `-flag=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Flag { name: String, value: Option<String> },
    Positional(String),
}

/// Splits arguments (without argv[0]) into flags and positionals. After
/// `--`, everything is positional; a lone `-` is positional too.
pub struct Args<I> {
    inner: I,
    flags_done: bool,
}

impl<I: Iterator<Item = String>> Args<I> {
    pub fn new(args: I) -> Self {
        Args { inner: args, flags_done: false }
    }

    /// The inline value of `-flag=value`, or else the next argument.
    pub fn param(&mut self, flag: &str, inline: Option<String>) -> Result<String, ArgError> {
        inline
            .or_else(|| self.inner.next())
            .ok_or_else(|| ArgError::MissingArg(flag.into()))
    }
}

impl<I: Iterator<Item = String>> Iterator for Args<I> {
    type Item = Arg;

    fn next(&mut self) -> Option<Arg> {
        loop {
            let arg = self.inner.next()?;
            if self.flags_done {
                return Some(Arg::Positional(arg));
            }
            match arg.strip_prefix('-') {
                Some("-") => self.flags_done = true,
                Some(flag) if !flag.is_empty() => {
                    let (name, value) = match flag.split_once('=') {
                        Some((name, value)) => (name.to_owned(), Some(value.to_owned())),
                        None => (flag.to_owned(), None),
                    };
                    return Some(Arg::Flag { name, value });
                },
                _ => return Some(Arg::Positional(arg)),
            }
        }
    }
}
