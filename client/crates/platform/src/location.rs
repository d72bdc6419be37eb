//! Address Bar Access
//!
//! The current page URL, readable and replaceable in place (the
//! `history.replaceState` equivalent: the visible URL changes, no navigation
//! happens).

use parking_lot::RwLock;
use url::Url;

/// Current-URL capability
pub trait AddressBar: Send + Sync {
    /// The URL currently shown
    fn current(&self) -> Url;

    /// Replace the visible URL without navigating
    fn replace(&self, url: Url);
}

impl<T: AddressBar + ?Sized> AddressBar for std::sync::Arc<T> {
    fn current(&self) -> Url {
        (**self).current()
    }

    fn replace(&self, url: Url) {
        (**self).replace(url)
    }
}

/// Address bar held in memory (tests, command-line host)
#[derive(Debug)]
pub struct MemoryAddressBar {
    url: RwLock<Url>,
}

impl MemoryAddressBar {
    pub fn new(url: Url) -> Self {
        Self {
            url: RwLock::new(url),
        }
    }

    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(url)?))
    }
}

impl AddressBar for MemoryAddressBar {
    fn current(&self) -> Url {
        self.url.read().clone()
    }

    fn replace(&self, url: Url) {
        *self.url.write() = url;
    }
}

/// First non-empty value of a query parameter
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Copy of `url` with every occurrence of `name` removed from the query.
///
/// Other parameters keep their order; an emptied query is dropped entirely
/// (`/path?token=x` becomes `/path`, not `/path?`). The fragment is kept.
pub fn without_query_param(url: &Url, name: &str) -> Url {
    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != name)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if remaining.is_empty() {
        stripped.set_query(None);
    } else {
        stripped
            .query_pairs_mut()
            .clear()
            .extend_pairs(remaining.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    stripped
}

/// Read a query parameter and remove it from the address bar in one step
pub fn take_query_param(bar: &dyn AddressBar, name: &str) -> Option<String> {
    let current = bar.current();
    let value = query_param(&current, name)?;
    bar.replace(without_query_param(&current, name));
    Some(value)
}
