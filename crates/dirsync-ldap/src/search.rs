//! Paged search assembly
//!
//! The cookie loop for RFC 2696 simple paged results. Each request carries
//! the page-size hint and the cookie returned by the previous response; an
//! empty returned cookie ends the traversal. A failed page discards
//! everything gathered so far — the search is all-or-nothing per run, so a
//! truncated entry set can never masquerade as a complete one.

use async_trait::async_trait;
use ldap3::controls::{Control, ControlType, PagedResults};
use ldap3::{Ldap, Scope, SearchEntry};
use tracing::{debug, warn};

use dirsync_core::entry::DirectoryEntry;
use dirsync_core::error::{SyncError, SyncResult};

/// Attributes requested for person entries.
///
/// Restricting the attribute list keeps payloads small and avoids pulling
/// attributes the reconciler has no business seeing.
pub fn user_sync_attributes() -> Vec<&'static str> {
    vec![
        "samaccountname",
        "userprincipalname",
        "givenname",
        "cn",
        "mail",
        "sn",
        "memberof",
        "distinguishedname",
    ]
}

/// One server page: converted entries plus the cookie for the next request.
pub(crate) struct Page {
    pub entries: Vec<DirectoryEntry>,
    pub cookie: Vec<u8>,
}

/// Source of search result pages, keyed by the server cookie.
///
/// Factored out of the LDAP session so the cookie protocol is exercisable
/// without a live server.
#[async_trait]
pub(crate) trait PageSource: Send {
    /// Fetch the page identified by `cookie` (empty for the first page).
    async fn fetch(&mut self, cookie: &[u8]) -> SyncResult<Page>;
}

/// Drive a [`PageSource`] to completion, appending pages in order.
///
/// Presents the cookie returned by page N with the request for page N+1 and
/// stops once the server returns an empty cookie. Any page failure
/// propagates immediately, dropping the partial result.
pub(crate) async fn collect_paged<P: PageSource>(source: &mut P) -> SyncResult<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    let mut cookie: Vec<u8> = Vec::new();
    let mut pages = 0usize;

    loop {
        let page = source.fetch(&cookie).await?;
        pages += 1;
        entries.extend(page.entries);

        if page.cookie.is_empty() {
            break;
        }
        cookie = page.cookie;
    }

    debug!(pages, entry_count = entries.len(), "paged search complete");
    Ok(entries)
}

/// Extract the paged-results cookie from a response's controls.
fn next_cookie(ctrls: &[Control]) -> Option<Vec<u8>> {
    ctrls.iter().find_map(|ctrl| match ctrl {
        Control(Some(ControlType::PagedResults), raw) => {
            Some(raw.parse::<PagedResults>().cookie)
        }
        _ => None,
    })
}

/// Convert a raw search entry into a [`DirectoryEntry`].
///
/// Entries without a distinguished name are result artifacts without an
/// identity and are dropped. Binary attribute values are not part of the
/// person attribute set and are ignored.
fn entry_from_search(raw: SearchEntry) -> Option<DirectoryEntry> {
    if raw.dn.is_empty() {
        return None;
    }

    let mut entry = DirectoryEntry::new(raw.dn);
    for (name, values) in raw.attrs {
        entry.insert(name, values);
    }
    Some(entry)
}

/// [`PageSource`] backed by a live LDAP connection.
pub(crate) struct LdapPageSource<'a> {
    ldap: &'a mut Ldap,
    base: String,
    filter: String,
    page_size: i32,
    read_timeout: std::time::Duration,
}

impl<'a> LdapPageSource<'a> {
    pub(crate) fn new(
        ldap: &'a mut Ldap,
        base: &str,
        filter: &str,
        page_size: u32,
        read_timeout: std::time::Duration,
    ) -> Self {
        Self {
            ldap,
            base: base.to_string(),
            filter: filter.to_string(),
            page_size: page_size as i32,
            read_timeout,
        }
    }
}

#[async_trait]
impl PageSource for LdapPageSource<'_> {
    async fn fetch(&mut self, cookie: &[u8]) -> SyncResult<Page> {
        let result = self
            .ldap
            .with_timeout(self.read_timeout)
            .with_controls(PagedResults {
                size: self.page_size,
                cookie: cookie.to_vec(),
            })
            .search(
                &self.base,
                Scope::Subtree,
                &self.filter,
                user_sync_attributes(),
            )
            .await
            .map_err(|e| {
                SyncError::search_failed_with_source(
                    format!("search request failed under '{}'", self.base),
                    e,
                )
            })?;

        let (raw_entries, res) = result.success().map_err(|e| {
            SyncError::search_failed(format!("search rejected under '{}': {e}", self.base))
        })?;

        let mut entries = Vec::with_capacity(raw_entries.len());
        let mut referrals = 0usize;
        let mut dropped = 0usize;

        for raw in raw_entries {
            // Referral references are surfaced, never chased; following
            // them would mean unbounded chained lookups against servers
            // the service account was never pointed at.
            if raw.is_ref() {
                referrals += 1;
                continue;
            }

            match entry_from_search(SearchEntry::construct(raw)) {
                Some(entry) => entries.push(entry),
                None => dropped += 1,
            }
        }

        if referrals > 0 {
            warn!(referrals, base = %self.base, "skipped referral references in search results");
        }
        if dropped > 0 {
            debug!(dropped, "dropped entries without a distinguished name");
        }

        let cookie = next_cookie(&res.ctrls).unwrap_or_default();

        debug!(
            entry_count = entries.len(),
            more = !cookie.is_empty(),
            "fetched search result page"
        );

        Ok(Page { entries, cookie })
    }
}
