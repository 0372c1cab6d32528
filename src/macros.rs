/// Builds [`Fields`] from `key => value` pairs, keeping their order.
///
/// Keys may be anything implementing [`ToString`], and values anything that
/// converts into a [`Value`].
///
/// # Examples
///
/// ```
/// use tracing_tabular::fields;
/// use tracing_tabular::record::Value;
///
/// let fields = fields! {
///     "user_id" => 42,
///     "tags" => vec!["admin", "beta"],
///     0 => "numeric key",
/// };
///
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields.get("0"), Some(&Value::from("numeric key")));
/// ```
///
/// [`Fields`]: crate::record::Fields
/// [`Value`]: crate::record::Value
#[macro_export]
macro_rules! fields {
    () => {
        $crate::record::Fields::new()
    };
    ($( $key:expr => $value:expr ),+ $(,)?) => {{
        let mut __fields = $crate::record::Fields::new();
        $( __fields.insert($key, $value); )+
        __fields
    }};
}
