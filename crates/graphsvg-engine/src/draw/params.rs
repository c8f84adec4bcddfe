use std::fmt;
use std::rc::Rc;

/// A real function of one real variable, shared between the command log and
/// every replay of it.
#[derive(Clone)]
pub struct Func(Rc<dyn Fn(f64) -> f64>);

impl Func {
    pub fn new(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[inline]
    pub fn call(&self, x: f64) -> f64 {
        (self.0)(x)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Func(..)")
    }
}

/// Positional argument to a primitive.
#[derive(Debug, Clone)]
pub enum Param {
    Number(f64),
    Function(Func),
    Text(String),
}

impl Param {
    pub fn kind(&self) -> &'static str {
        match self {
            Param::Number(_) => "number",
            Param::Function(_) => "function",
            Param::Text(_) => "text",
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Param::Number(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_function(&self) -> Option<&Func> {
        match self {
            Param::Function(f) => Some(f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Param::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Number(v)
    }
}

impl From<Func> for Param {
    fn from(f: Func) -> Self {
        Param::Function(f)
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Text(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Text(s)
    }
}

/// Named options, kept in insertion order so the attributes they turn into
/// serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, String)>,
}

impl Props {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Props::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Leading number of the value, ignoring a trailing unit (`"8px"` is 8).
    pub fn get_length(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(leading_number)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates entries whose key is not in `skip`.
    pub(crate) fn iter_except<'a>(
        &'a self,
        skip: &'a [&'a str],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter().filter(move |(k, _)| !skip.contains(k))
    }

    /// Rewrites a `blend` entry into a `mix-blend-mode` style.
    ///
    /// Returns `true` when a rewrite happened. An existing `style` is kept and
    /// the blend mode is appended to it.
    pub fn take_blend(&mut self) -> bool {
        let Some(blend) = self.remove("blend") else { return false };
        let rule = format!("mix-blend-mode:{}", blend.trim());
        let style = match self.get("style") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{};{rule}", existing.trim().trim_end_matches(';'))
            }
            _ => rule,
        };
        self.set("style", style);
        true
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}

/// Longest numeric prefix of `s` after leading whitespace, so `"1.5em"`
/// reads as 1.5 and `"px"` as nothing.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();
    let int = digits(end);
    end += int;
    let mut frac = 0;
    if bytes.get(end) == Some(&b'.') {
        frac = digits(end + 1);
        if int + frac > 0 {
            end += 1 + frac;
        }
    }
    if int + frac == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let n = digits(exp);
        if n > 0 {
            end = exp + n;
        }
    }
    s[..end].parse().ok()
}
