//! String value with direct, lazily-composed and native-associated backings.

use crate::capabilities::NativeCounterpart;
use crate::errors::{BridgeError, Result};
use crate::value::fast_hasher;
use ahash::RandomState;
use hashbrown::HashSet;
use smallvec::SmallVec;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

/// Concatenations whose realized parts fit in this many bytes are built
/// eagerly instead of lazily.
const EAGER_CONCAT_CAP: usize = 22;

/// Realized character data together with its character count.
#[derive(Clone)]
pub struct StrData {
    text: Arc<str>,
    char_count: usize,
}

impl StrData {
    fn new(text: Arc<str>) -> Self {
        let char_count = count_chars(&text);
        Self { text, char_count }
    }

    fn from_string(s: String) -> Self {
        Self::new(Arc::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// True when every character is one byte, so char offsets are byte offsets.
    #[inline]
    fn is_ascii(&self) -> bool {
        self.char_count == self.text.len()
    }
}

fn count_chars(s: &str) -> usize {
    // Fast path: all-ASCII strings have one char per byte
    if s.is_ascii() { s.len() } else { s.chars().count() }
}

pub type DeferredFn = Box<dyn Fn() -> String + Send + Sync>;

/// An unevaluated string composition.
pub enum LazyKind {
    Concat(PyStr, PyStr),
    Int(i64),
    Float(f64),
    Deferred(DeferredFn),
}

pub struct LazyStr {
    kind: LazyKind,
    char_count: Option<usize>,
    realized: OnceLock<StrData>,
}

impl LazyStr {
    fn new(kind: LazyKind) -> Self {
        let char_count = match &kind {
            LazyKind::Concat(a, b) => a.known_len().zip(b.known_len()).map(|(a, b)| a + b),
            LazyKind::Int(_) | LazyKind::Float(_) | LazyKind::Deferred(_) => None,
        };
        Self {
            kind,
            char_count,
            realized: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> &LazyKind {
        &self.kind
    }

    pub fn is_realized(&self) -> bool {
        self.realized.get().is_some()
    }

    /// Flattens the composition on first use; every later call (from any
    /// thread) sees the same cached data.
    fn realize(&self) -> &StrData {
        self.realized.get_or_init(|| {
            let text = self.render();
            tracing::trace!(len = text.len(), "materialized lazy string");
            StrData::from_string(text)
        })
    }

    fn render(&self) -> String {
        match &self.kind {
            LazyKind::Concat(left, right) => flatten_concat(left, right),
            LazyKind::Int(i) => itoa::Buffer::new().format(*i).to_owned(),
            LazyKind::Float(f) => format_float(*f),
            LazyKind::Deferred(f) => f(),
        }
    }
}

impl Drop for LazyStr {
    // Unlinks uniquely-owned concat chains iteratively so dropping a deep
    // chain does not recurse once per level.
    fn drop(&mut self) {
        let mut pending: Vec<PyStr> = Vec::new();
        if let LazyKind::Concat(l, r) = &mut self.kind {
            pending.push(std::mem::take(l));
            pending.push(std::mem::take(r));
        }
        while let Some(part) = pending.pop() {
            if let PyStr::Lazy(lazy) = part {
                if let Some(mut inner) = Arc::into_inner(lazy) {
                    if let LazyKind::Concat(l, r) = &mut inner.kind {
                        pending.push(std::mem::take(l));
                        pending.push(std::mem::take(r));
                    }
                }
            }
        }
    }
}

/// Walks nested concatenations with an explicit stack so deep chains do not
/// recurse. Unrealized inner concatenations are not cached on the way.
fn flatten_concat(left: &PyStr, right: &PyStr) -> String {
    let mut out = String::new();
    let mut stack: SmallVec<[&PyStr; 8]> = SmallVec::new();
    stack.push(right);
    stack.push(left);
    while let Some(part) = stack.pop() {
        match part {
            PyStr::Lazy(lazy) => match (lazy.realized.get(), &lazy.kind) {
                (Some(done), _) => out.push_str(done.as_str()),
                (None, LazyKind::Concat(l, r)) => {
                    stack.push(r);
                    stack.push(l);
                }
                (None, _) => out.push_str(part.as_str()),
            },
            _ => out.push_str(part.as_str()),
        }
    }
    out
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let mut buf = ryu::Buffer::new();
    let digits = buf.format_finite(f);
    // Exponents carry a sign and at least two digits: 1e+16, 1e-07.
    match digits.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, exp) = match exp.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{exp:0>2}")
        }
        None => digits.to_owned(),
    }
}

/// A string value. Equality and hashing only ever look at the realized text,
/// so the backing variant is unobservable through them.
#[derive(Clone)]
pub enum PyStr {
    Direct(StrData),
    Lazy(Arc<LazyStr>),
    Native {
        data: StrData,
        handle: Arc<dyn NativeCounterpart>,
    },
}

impl PyStr {
    pub fn new() -> Self {
        Self::from_str("")
    }

    pub fn from_str(s: &str) -> Self {
        PyStr::Direct(StrData::new(Arc::from(s)))
    }

    pub fn from_string(s: String) -> Self {
        PyStr::Direct(StrData::from_string(s))
    }

    /// Always builds a lazy concatenation.
    pub fn lazy_concat(left: &PyStr, right: &PyStr) -> Self {
        PyStr::Lazy(Arc::new(LazyStr::new(LazyKind::Concat(left.clone(), right.clone()))))
    }

    /// Concatenates, building short results eagerly and long ones lazily.
    pub fn concat(left: &PyStr, right: &PyStr) -> Self {
        if let (Some(a), Some(b)) = (left.realized(), right.realized()) {
            if a.text.is_empty() {
                return right.clone();
            }
            if b.text.is_empty() {
                return left.clone();
            }
            let total = a.text.len() + b.text.len();
            if total <= EAGER_CONCAT_CAP {
                let mut out = String::with_capacity(total);
                out.push_str(a.as_str());
                out.push_str(b.as_str());
                return PyStr::Direct(StrData {
                    text: Arc::from(out),
                    char_count: a.char_count + b.char_count,
                });
            }
        }
        Self::lazy_concat(left, right)
    }

    pub fn lazy_int(i: i64) -> Self {
        PyStr::Lazy(Arc::new(LazyStr::new(LazyKind::Int(i))))
    }

    pub fn lazy_float(f: f64) -> Self {
        PyStr::Lazy(Arc::new(LazyStr::new(LazyKind::Float(f))))
    }

    /// Wraps a caller-supplied computation. It runs at most once per value
    /// (clones share the cache).
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        PyStr::Lazy(Arc::new(LazyStr::new(LazyKind::Deferred(Box::new(f)))))
    }

    /// Realized data without forcing a lazy composition.
    fn realized(&self) -> Option<&StrData> {
        match self {
            PyStr::Direct(data) | PyStr::Native { data, .. } => Some(data),
            PyStr::Lazy(lazy) => lazy.realized.get(),
        }
    }

    fn data(&self) -> &StrData {
        match self {
            PyStr::Direct(data) | PyStr::Native { data, .. } => data,
            PyStr::Lazy(lazy) => lazy.realize(),
        }
    }

    /// Character count if it is known without flattening.
    fn known_len(&self) -> Option<usize> {
        match self {
            PyStr::Lazy(lazy) => lazy.char_count.or_else(|| lazy.realized.get().map(|d| d.char_count)),
            _ => self.realized().map(|d| d.char_count),
        }
    }

    /// The realized text. A lazy backing is flattened once and cached.
    pub fn as_str(&self) -> &str {
        self.data().as_str()
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, PyStr::Lazy(_))
    }

    pub fn is_materialized(&self) -> bool {
        self.realized().is_some()
    }

    /// Replaces a lazy backing with its realized form. The logical value
    /// does not change.
    pub fn materialize(&mut self) {
        if let PyStr::Lazy(lazy) = self {
            let data = lazy.realize().clone();
            *self = PyStr::Direct(data);
        }
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        match self.known_len() {
            Some(n) => n,
            None => self.data().char_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True iff a native counterpart is attached and it reports itself as
    /// materialized. Never cached.
    pub fn is_native(&self) -> bool {
        match self {
            PyStr::Native { handle, .. } => handle.is_native(),
            _ => false,
        }
    }

    pub fn native_counterpart(&self) -> Option<&Arc<dyn NativeCounterpart>> {
        match self {
            PyStr::Native { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// Associates a native counterpart, materializing first if needed.
    /// Replaces any counterpart already attached.
    pub fn attach_native(&mut self, handle: Arc<dyn NativeCounterpart>) {
        let data = self.data().clone();
        *self = PyStr::Native { data, handle };
    }

    pub fn detach_native(&mut self) -> Option<Arc<dyn NativeCounterpart>> {
        match std::mem::replace(self, PyStr::new()) {
            PyStr::Native { data, handle } => {
                *self = PyStr::Direct(data);
                Some(handle)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Hash of the realized text. Identical across backings and calls.
    pub fn py_hash(&self) -> i64 {
        let mut hasher = fast_hasher().build_hasher();
        hasher.write(self.as_str().as_bytes());
        hasher.finish() as i64
    }

    pub fn char_at(&self, index: usize) -> Result<char> {
        let data = self.data();
        if index >= data.char_count {
            return Err(BridgeError::index_out_of_range(index, data.char_count));
        }
        if data.is_ascii() {
            return Ok(data.text.as_bytes()[index] as char);
        }
        data.text
            .chars()
            .nth(index)
            .ok_or_else(|| BridgeError::index_out_of_range(index, data.char_count))
    }

    /// Characters in `start..end`.
    pub fn substring(&self, start: usize, end: usize) -> Result<PyStr> {
        let data = self.data();
        if end > data.char_count {
            return Err(BridgeError::index_out_of_range(end, data.char_count));
        }
        if start > end {
            return Err(BridgeError::index_out_of_range(start, data.char_count));
        }
        let from = byte_offset(data, start);
        let to = byte_offset(data, end);
        Ok(PyStr::Direct(StrData {
            text: Arc::from(&data.text[from..to]),
            char_count: end - start,
        }))
    }

    pub fn substring_from(&self, start: usize) -> Result<PyStr> {
        self.substring(start, self.len())
    }

    /// Character offset of the first `needle` at or after `from`.
    pub fn index_of(&self, needle: &str, from: usize) -> Option<usize> {
        let data = self.data();
        if from > data.char_count {
            return None;
        }
        let start = byte_offset(data, from);
        let pos = data.text[start..].find(needle)? + start;
        if data.is_ascii() {
            Some(pos)
        } else {
            Some(count_chars(&data.text[..pos]))
        }
    }

    pub fn char_to_string(c: char) -> PyStr {
        let mut buf = [0u8; 4];
        PyStr::from_str(c.encode_utf8(&mut buf))
    }

    /// Whitespace as the native side classifies it: Unicode space
    /// separators except the non-breaking ones, plus the ASCII control
    /// separators.
    pub fn is_whitespace(c: char) -> bool {
        match c {
            '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' => true,
            '\u{1C}'..='\u{1F}' => true,
            '\u{A0}' | '\u{2007}' | '\u{202F}' | '\u{85}' => false,
            _ => c.is_whitespace(),
        }
    }
}

/// Byte offset of a character offset already known to be `<= char_count`.
fn byte_offset(data: &StrData, chars: usize) -> usize {
    if chars >= data.char_count {
        return data.text.len();
    }
    if data.is_ascii() {
        return chars;
    }
    data.text
        .char_indices()
        .nth(chars)
        .map(|(b, _)| b)
        .unwrap_or(data.text.len())
}

impl Default for PyStr {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PyStr {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.data(), other.data());
        Arc::ptr_eq(&a.text, &b.text) || (a.char_count == b.char_count && a.text == b.text)
    }
}

impl Eq for PyStr {}

impl PartialEq<str> for PyStr {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for PyStr {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Hash for PyStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().as_bytes().hash(state);
    }
}

impl fmt::Debug for PyStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for PyStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PyStr {
    fn from(value: &str) -> Self {
        PyStr::from_str(value)
    }
}

impl From<String> for PyStr {
    fn from(value: String) -> Self {
        PyStr::from_string(value)
    }
}

impl AsRef<str> for PyStr {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for PyStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

/// Deduplicates realized string storage.
pub struct Interner {
    set: HashSet<Arc<str>, RandomState>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            set: HashSet::with_hasher(fast_hasher()),
        }
    }

    /// Materializes `s` and returns a direct string sharing storage with the
    /// first equal string interned. Native association is not carried over.
    pub fn intern(&mut self, s: &PyStr) -> PyStr {
        let data = s.data();
        let text = match self.set.get(data.as_str()) {
            Some(existing) => existing.clone(),
            None => {
                self.set.insert(data.text.clone());
                data.text.clone()
            }
        };
        PyStr::Direct(StrData {
            text,
            char_count: data.char_count,
        })
    }

    pub fn contains(&self, s: &str) -> bool {
        self.set.contains(s)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
