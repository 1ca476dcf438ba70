//! Argument modeling for git command construction.

mod id;

pub use id::CommitId;

/// Tells git that no further options follow; older versions reject it.
pub const END_OF_OPTIONS: &str = "--end-of-options";

/// One element of an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// An option switch such as `--porcelain`.
    Flag(String),
    /// A positional value.
    Value(String),
    /// A named option rendered as `name value`.
    Opt { name: String, value: OptValue },
    /// A commit identifier, already restricted to a safe alphabet.
    Id(CommitId),
    /// Contributes nothing to the command line.
    Omitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptValue {
    Str(String),
    Bool(bool),
    Id(CommitId),
    Omitted,
}

impl Arg {
    pub fn flag(f: impl Into<String>) -> Self { Arg::Flag(f.into()) }
    pub fn value(v: impl Into<String>) -> Self { Arg::Value(v.into()) }
    pub fn opt(name: impl Into<String>, value: impl Into<OptValue>) -> Self {
        Arg::Opt { name: name.into(), value: value.into() }
    }

    /// The literal text of a flag or positional value.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Arg::Flag(s) | Arg::Value(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_end_of_options(&self) -> bool {
        self.as_literal() == Some(END_OF_OPTIONS)
    }
}

impl From<&str> for Arg { fn from(v: &str) -> Self { Arg::Value(v.to_string()) } }
impl From<String> for Arg { fn from(v: String) -> Self { Arg::Value(v) } }
impl From<&String> for Arg { fn from(v: &String) -> Self { Arg::Value(v.clone()) } }
impl From<CommitId> for Arg { fn from(v: CommitId) -> Self { Arg::Id(v) } }
impl From<&CommitId> for Arg { fn from(v: &CommitId) -> Self { Arg::Id(v.clone()) } }
/// Standalone booleans carry no meaning on a command line.
impl From<bool> for Arg { fn from(_: bool) -> Self { Arg::Omitted } }
impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self { v.map_or(Arg::Omitted, Into::into) }
}

impl From<&str> for OptValue { fn from(v: &str) -> Self { OptValue::Str(v.to_string()) } }
impl From<String> for OptValue { fn from(v: String) -> Self { OptValue::Str(v) } }
impl From<&String> for OptValue { fn from(v: &String) -> Self { OptValue::Str(v.clone()) } }
impl From<bool> for OptValue { fn from(v: bool) -> Self { OptValue::Bool(v) } }
impl From<CommitId> for OptValue { fn from(v: CommitId) -> Self { OptValue::Id(v) } }
impl From<&CommitId> for OptValue { fn from(v: &CommitId) -> Self { OptValue::Id(v.clone()) } }
impl<T: Into<OptValue>> From<Option<T>> for OptValue {
    fn from(v: Option<T>) -> Self { v.map_or(OptValue::Omitted, Into::into) }
}

macro_rules! numeric_args {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg { fn from(v: $t) -> Self { Arg::Value(v.to_string()) } }
        impl From<$t> for OptValue { fn from(v: $t) -> Self { OptValue::Str(v.to_string()) } }
    )*};
}

numeric_args!(i32, i64, u8, u16, u32, u64, usize, f64);

/// Ordered argument list with a fluent builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(pub Vec<Arg>);

impl Args {
    pub fn new() -> Self { Args(Vec::new()) }
    pub fn arg(mut self, a: impl Into<Arg>) -> Self { self.0.push(a.into()); self }
    pub fn flag(mut self, f: impl Into<String>) -> Self { self.0.push(Arg::flag(f)); self }
    pub fn opt(mut self, name: impl Into<String>, value: impl Into<OptValue>) -> Self {
        self.0.push(Arg::opt(name, value));
        self
    }
    pub fn id(mut self, id: CommitId) -> Self { self.0.push(Arg::Id(id)); self }
    pub fn end_of_options(self) -> Self { self.flag(END_OF_OPTIONS) }
    /// Appends every argument of `other`, keeping its order.
    pub fn extend(mut self, other: Args) -> Self { self.0.extend(other.0); self }

    pub fn push(&mut self, a: impl Into<Arg>) { self.0.push(a.into()); }
    pub fn iter(&self) -> std::slice::Iter<'_, Arg> { self.0.iter() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<A: Into<Arg>> FromIterator<A> for Args {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Args(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<Arg>> for Args {
    fn from(v: Vec<Arg>) -> Self { Args(v) }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Arg;
    type IntoIter = std::slice::Iter<'a, Arg>;
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

/// Environment variables in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env(Vec<(String, String)>);

impl Env {
    pub fn new() -> Self { Env(Vec::new()) }

    pub fn with(mut self, k: &str, v: impl ToString) -> Self {
        self.set(k, v);
        self
    }

    /// Replaces an existing variable in place, otherwise appends it.
    pub fn set(&mut self, k: &str, v: impl ToString) {
        let v = v.to_string();
        match self.0.iter_mut().find(|(name, _)| name == k) {
            Some(entry) => entry.1 = v,
            None => self.0.push((k.to_string(), v)),
        }
    }

    pub fn get(&self, k: &str) -> Option<&str> {
        self.0.iter().find(|(name, _)| name == k).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Env::new();
        for (k, v) in iter {
            let k: String = k.into();
            env.set(&k, v);
        }
        env
    }
}
