use crate::formatter::Error;

#[cold]
#[inline(never)]
pub fn span_not_in_ctx<T>() -> T {
    panic!("Span not in context, this is a bug");
}

#[cold]
#[inline(never)]
pub fn span_fields_not_in_exts<T>() -> T {
    panic!("Span extension doesn't contain `SpanFields`, this is a bug");
}

#[allow(clippy::needless_pass_by_value)]
#[cold]
#[inline(never)]
pub fn formatting_error(error: Error) -> String {
    panic!("Formatting log record failed: {}", error);
}
