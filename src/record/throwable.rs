use std::any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::panic::Location;

/// An error captured into a [`Record`], along with everything that caused it.
///
/// Throwables form a chain through [`previous`]: the outermost error comes
/// first, and each link points to the error that caused it.
///
/// # Examples
///
/// Building a chain by hand:
/// ```
/// use tracing_tabular::record::Throwable;
///
/// let root = Throwable::new("io::Error", "connection reset").with_code(104);
/// let err = Throwable::new("RequestError", "request failed").caused_by(root);
///
/// assert_eq!(err.chain().count(), 2);
/// ```
///
/// Capturing any [`std::error::Error`]:
/// ```
/// use tracing_tabular::record::Throwable;
///
/// let err = "x".parse::<u8>().unwrap_err();
/// let throwable = Throwable::from_error(&err);
///
/// assert!(throwable.kind().ends_with("ParseIntError"));
/// assert!(throwable.line() > 0);
/// ```
///
/// [`Record`]: crate::record::Record
/// [`previous`]: Throwable::previous
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Throwable {
    pub(crate) kind: String,
    pub(crate) message: String,
    pub(crate) code: i64,
    pub(crate) file: String,
    pub(crate) line: u32,
    pub(crate) trace: String,
    pub(crate) previous: Option<Box<Throwable>>,
}

const CAUSE_KIND: &str = "dyn core::error::Error";

impl Throwable {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Throwable {
            kind: kind.into(),
            message: message.into(),
            code: 0,
            file: String::new(),
            line: 0,
            trace: String::new(),
            previous: None,
        }
    }

    /// Captures `error` and its [`source`] chain.
    ///
    /// The outermost throwable is located at the caller and carries a
    /// backtrace if backtraces are enabled, e.g. through `RUST_BACKTRACE`.
    /// Causes only carry their messages; their concrete types are erased.
    ///
    /// [`source`]: std::error::Error::source
    #[track_caller]
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        Self::capture(any::type_name::<E>(), error, Location::caller())
    }

    /// Like [`from_error`], for errors whose type is already erased.
    ///
    /// [`from_error`]: Throwable::from_error
    #[track_caller]
    pub fn from_dyn_error(error: &(dyn Error + 'static)) -> Self {
        Self::capture(CAUSE_KIND, error, Location::caller())
    }

    fn capture<E: Error + ?Sized>(kind: &str, error: &E, location: &Location<'_>) -> Self {
        let backtrace = Backtrace::capture();
        let trace = match backtrace.status() {
            BacktraceStatus::Captured => backtrace.to_string(),
            _ => String::new(),
        };

        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(Throwable::new(CAUSE_KIND, cause.to_string()));
            source = cause.source();
        }

        let previous = causes
            .into_iter()
            .rev()
            .fold(None, |previous, mut cause: Throwable| {
                cause.previous = previous;
                Some(Box::new(cause))
            });

        Throwable {
            kind: kind.to_string(),
            message: error.to_string(),
            code: 0,
            file: location.file().to_string(),
            line: location.line(),
            trace,
            previous,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Sets the source location the error was raised at.
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = trace.into();
        self
    }

    /// Appends `cause` to the end of the chain.
    pub fn caused_by(mut self, cause: Throwable) -> Self {
        let tail = match self.previous.take() {
            Some(previous) => previous.caused_by(cause),
            None => cause,
        };
        self.previous = Some(Box::new(tail));
        self
    }

    /// Returns the name of the errors type.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// Returns the error that caused this one, if any.
    pub fn previous(&self) -> Option<&Throwable> {
        self.previous.as_deref()
    }

    /// Iterates over this throwable and all of its causes, outermost first.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }
}

/// Iterator returned by [`Throwable::chain`].
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    next: Option<&'a Throwable>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Throwable;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous();
        Some(current)
    }
}
