/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Objects become tables, arrays become arrays, and anything else goes
/// through `Value::from`. TOML has no null, so neither does the macro.
///
/// ```rust
/// use typed_toml::{toml, Value};
///
/// let project = toml!({
///     "name": "spam",
///     "keywords": ["egg", "bacon"],
///     "urls": { "homepage": "example.com" }
/// });
/// assert_eq!(project["urls"]["homepage"], Value::from("example.com"));
/// ```
#[macro_export]
macro_rules! toml {
    (true) => {
        $crate::Value::Boolean(true)
    };

    (false) => {
        $crate::Value::Boolean(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toml!($elem)),*])
    };

    ({}) => {
        $crate::Value::Table($crate::Table::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::Table::new();
        $(
            table.insert($key, $crate::toml!($value));
        )*
        $crate::Value::Table(table)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
