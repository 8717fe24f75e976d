use std::collections::HashMap;

/// How a namespace URI is written in an alias-shortened key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceBinding {
    /// No declaration in scope maps to the URI.
    Unknown,
    /// The URI is the unprefixed default namespace (`xmlns="..."`).
    Default,
    /// The URI is bound to this prefix.
    Prefix(String),
}

static UNKNOWN: NamespaceBinding = NamespaceBinding::Unknown;

/// Namespace declarations visible at one element, plus the URI -> alias
/// reverse table used to shorten qualified names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    declarations: Vec<(Option<String>, String)>,
    reverse: HashMap<String, NamespaceBinding>,
}

impl NamespaceContext {
    /// Builds a context from `(prefix, uri)` pairs; a `None` prefix declares
    /// the default namespace.
    ///
    /// When several prefixes share a URI the last one wins. A default
    /// namespace always takes precedence over prefixes bound to the same URI,
    /// wherever it appears in the sequence.
    pub fn new<I, P, U>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (Option<P>, U)>,
        P: Into<String>,
        U: Into<String>,
    {
        let declarations: Vec<(Option<String>, String)> = declarations
            .into_iter()
            .map(|(prefix, uri)| (prefix.map(Into::into), uri.into()))
            .collect();

        let mut reverse = HashMap::new();
        for (prefix, uri) in &declarations {
            if let Some(prefix) = prefix {
                reverse.insert(uri.clone(), NamespaceBinding::Prefix(prefix.clone()));
            }
        }
        for (prefix, uri) in &declarations {
            if prefix.is_none() {
                reverse.insert(uri.clone(), NamespaceBinding::Default);
            }
        }

        Self {
            declarations,
            reverse,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn declarations(&self) -> &[(Option<String>, String)] {
        &self.declarations
    }

    /// URI bound to `prefix`, or the default namespace when `prefix` is `None`.
    pub fn uri_for(&self, prefix: Option<&str>) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(declared, _)| declared.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    pub fn binding(&self, uri: &str) -> &NamespaceBinding {
        self.reverse.get(uri).unwrap_or(&UNKNOWN)
    }

    /// Rewrites `{uri}local` into `alias:local`.
    ///
    /// Plain names pass through untouched. URIs bound as the default
    /// namespace, and URIs with no binding at all, collapse to the bare local
    /// name.
    pub fn resolve(&self, name: &str) -> String {
        let Some((uri, local)) = split_qualified(name) else {
            return name.to_string();
        };
        match self.binding(uri) {
            NamespaceBinding::Prefix(alias) => format!("{alias}:{local}"),
            NamespaceBinding::Default | NamespaceBinding::Unknown => local.to_string(),
        }
    }
}

/// Clark notation: `{uri}local`, or just `local` without a namespace.
pub fn qualified(uri: Option<&str>, local: &str) -> String {
    match uri {
        Some(uri) if !uri.is_empty() => format!("{{{uri}}}{local}"),
        _ => local.to_string(),
    }
}

/// Splits `{uri}local` into its parts. Anything else, including an empty URI
/// or local part, is not a qualified name.
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let rest = name.strip_prefix('{')?;
    let end = rest.find('}')?;
    let (uri, local) = (&rest[..end], &rest[end + 1..]);
    if uri.is_empty() || local.is_empty() {
        return None;
    }
    Some((uri, local))
}
