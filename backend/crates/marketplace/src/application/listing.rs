//! Listing Operations
//!
//! Read, browse, owner-only edit and delete, shared by the product, post
//! and job services.

use platform::document::{Slice, json_contains};
use serde_json::Value;

use kernel::id::UserId;

use crate::domain::entity::Listing;
use crate::domain::repository::ListingRepository;
use crate::domain::search::{SearchQuery, Searchable};
use crate::error::{MarketError, MarketResult};

/// Load one listing or fail with `NotFound`
pub(crate) async fn fetch<L, R>(repo: &R, id: L::Id) -> MarketResult<L>
where
    L: Listing,
    R: ListingRepository<L> + Sync,
{
    repo.find_by_id(id)
        .await?
        .ok_or(MarketError::NotFound(L::NAME))
}

/// Filtered listing, optionally narrowed and ranked by a text query
///
/// Without query tokens this is a plain newest-first page. With tokens the
/// store yields candidates, the filter is re-applied to each, and the
/// ranked result is paged.
pub(crate) async fn browse<L, R>(
    repo: &R,
    filter: &Value,
    query: &SearchQuery,
    slice: Slice,
) -> MarketResult<Vec<L>>
where
    L: Listing + Searchable,
    R: ListingRepository<L> + Sync,
{
    if query.is_empty() {
        return repo.list(filter, slice).await;
    }

    let candidates = repo.scan(&query.prefilter_terms()).await?;
    let mut matching = Vec::with_capacity(candidates.len());
    for listing in candidates {
        let body = serde_json::to_value(&listing).map_err(|e| MarketError::Internal(e.to_string()))?;
        if json_contains(&body, filter) {
            matching.push(listing);
        }
    }

    Ok(slice.apply(query.rank(matching)))
}

/// Owner-only atomic edit; returns the stored result
///
/// Ownership is checked inside the update, so a rejected edit writes nothing.
pub(crate) async fn edit<L, R, F>(repo: &R, id: L::Id, requester: UserId, mut f: F) -> MarketResult<L>
where
    L: Listing,
    R: ListingRepository<L> + Sync,
    F: FnMut(&mut L) -> MarketResult<()> + Send,
{
    repo.modify(id, |listing| {
        listing.ensure_owner(requester)?;
        f(listing)?;
        Ok(listing.clone())
    })
    .await?
    .ok_or(MarketError::NotFound(L::NAME))
}

/// Owner-only delete, embedded children included
pub(crate) async fn remove<L, R>(repo: &R, id: L::Id, requester: UserId) -> MarketResult<()>
where
    L: Listing,
    R: ListingRepository<L> + Sync,
{
    let listing = fetch::<L, R>(repo, id).await?;
    listing.ensure_owner(requester)?;

    if !repo.delete(id).await? {
        return Err(MarketError::NotFound(L::NAME));
    }

    tracing::info!(listing = L::NAME, id = %id, owner = %requester, "Listing deleted");
    Ok(())
}
