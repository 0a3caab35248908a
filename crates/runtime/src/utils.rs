
pub fn default_offset() -> time::UtcOffset {
    // TODO: use tz-rs or something to get the right timezone?
    time::UtcOffset::UTC
}

pub fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().to_offset(default_offset()).year()
}

/// Writes an error followed by its numbered `source()` chain. Continuation
/// lines of a cause are aligned under its first line.
pub fn format_error<E, W>(f: &mut W, error: &E) -> std::fmt::Result where W: std::fmt::Write, E: std::error::Error {
    use std::fmt::Write;
    write!(f, "{}", error)?;

    let causes = std::iter::successors(error.source(), |cause| cause.source());
    for (n, cause) in causes.enumerate() {
        if n == 0 {
            f.write_str("\n\nCaused by:")?;
        }
        let text = cause.to_string();
        let mut lines = text.split('\n');
        write!(f, "\n{:>5}: {}", n, lines.next().unwrap_or_default())?;
        for line in lines {
            write!(f, "\n{:7}{}", "", line)?;
        }
    }
    Ok(())
}

pub fn format_error_disp<'a, E>(e: &'a E) -> impl std::fmt::Display + 'a where E: std::error::Error {
    struct Disp<'a, E>(&'a E);
    impl<E> std::fmt::Display for Disp<'_, E> where E: std::error::Error {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            format_error(f, self.0)
        }
    }
    Disp(e)
}
