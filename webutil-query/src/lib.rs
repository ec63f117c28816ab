mod multi;
mod quote;

pub use multi::MultiValueMap;
pub use quote::{urlquote, urlquote_plus, urlunquote, urlunquote_plus, UNRESERVED};

/// A query parameter value: a single string or a sequence of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    Seq(Vec<String>),
}

impl QueryValue {
    /// Single-string rendering used when sequences are not expanded.
    /// A sequence renders as a bracketed list of quoted items: `['1', '2']`.
    pub fn to_flat_string(&self) -> String {
        match self {
            QueryValue::Scalar(s) => s.clone(),
            QueryValue::Seq(items) => {
                let quoted: Vec<String> = items.iter().map(|s| quote_item(s)).collect();
                format!("[{}]", quoted.join(", "))
            }
        }
    }
}

// single quotes unless the item contains one and no double quote
fn quote_item(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Scalar(s)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Scalar(s.to_string())
    }
}

impl From<&String> for QueryValue {
    fn from(s: &String) -> Self {
        QueryValue::Scalar(s.clone())
    }
}

macro_rules! scalar_from_display {
    ($($t:ty),*) => {$(
        impl From<$t> for QueryValue {
            fn from(v: $t) -> Self {
                QueryValue::Scalar(v.to_string())
            }
        }
    )*};
}

scalar_from_display!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char);

impl<T: ToString> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::Seq(items.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for QueryValue {
    fn from(items: &[T]) -> Self {
        QueryValue::Seq(items.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for QueryValue {
    fn from(items: [T; N]) -> Self {
        QueryValue::Seq(items.iter().map(ToString::to_string).collect())
    }
}

/// Encode parameters as an `application/x-www-form-urlencoded` query string.
/// - Accepts ordered pairs, maps, or a [`MultiValueMap`].
/// - With `doseq`, a sequence value expands to one `key=item` pair per item (none if empty).
/// - Without `doseq`, a sequence is flattened to one value; see [`QueryValue::to_flat_string`].
/// - Keys and values are percent-encoded outside the unreserved set; spaces become `+`.
pub fn urlencode<I, K, V>(query: I, doseq: bool) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<QueryValue>,
{
    let mut pairs: Vec<String> = Vec::new();
    for (k, v) in query {
        let key = urlquote_plus(k.as_ref(), "");
        match v.into() {
            QueryValue::Seq(items) if doseq => {
                for item in items {
                    pairs.push(format!("{}={}", key, urlquote_plus(&item, "")));
                }
            }
            value => pairs.push(format!("{}={}", key, urlquote_plus(&value.to_flat_string(), ""))),
        }
    }
    pairs.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_string_of_sequences() {
        assert_eq!(QueryValue::from(vec![1u32, 2]).to_flat_string(), "['1', '2']");
        assert_eq!(QueryValue::from(Vec::<String>::new()).to_flat_string(), "[]");
        assert_eq!(QueryValue::from(["it's"]).to_flat_string(), "[\"it's\"]");
        assert_eq!(QueryValue::from(["a'\"b"]).to_flat_string(), "['a\\'\"b']");
        assert_eq!(QueryValue::from("plain").to_flat_string(), "plain");
    }

    #[test]
    fn scalars_from_numbers() {
        assert_eq!(QueryValue::from(42u8), QueryValue::Scalar("42".into()));
        assert_eq!(QueryValue::from(-7i64), QueryValue::Scalar("-7".into()));
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(urlencode([("q", "a b&c=d/e")], false), "q=a+b%26c%3Dd%2Fe");
        assert_eq!(urlencode([("k y", "\u{e9}")], false), "k+y=%C3%A9");
    }

    #[test]
    fn empty_input_gives_empty_string() {
        assert_eq!(urlencode(Vec::<(&str, &str)>::new(), true), "");
    }
}
