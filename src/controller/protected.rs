//! Protected copies of staged workspace documents.
//!
//! A document linked to a ticket must be readable by every participant, so
//! each non-protected staged document is duplicated into a protected copy
//! before the ticket is submitted. All copies are requested at once; the
//! submission may go on only if every copy succeeded.

use futures::future::join_all;

use crate::api::SupportApi;
use crate::error::{Result, SupportError};
use crate::model::StagedAttachment;

/// Replace every non-protected staged document by a protected copy.
///
/// On success the staged entries point to their copies, in staging order,
/// and the number of copies is returned. On failure the staging list is left
/// untouched and the first failure in staging order is returned; copies that
/// did succeed are not deleted.
pub async fn protect_staged<A: SupportApi>(
    api: &A,
    staged: &mut [StagedAttachment],
) -> Result<usize> {
    let pending: Vec<usize> = staged
        .iter()
        .enumerate()
        .filter(|(_, attachment)| !attachment.protected)
        .map(|(index, _)| index)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    tracing::debug!("requesting {} protected copies", pending.len());
    let documents: &[StagedAttachment] = staged;
    let results = join_all(
        pending
            .iter()
            .map(|&index| api.duplicate_attachment(&documents[index].id)),
    )
    .await;

    let mut copies = Vec::with_capacity(pending.len());
    let mut first_failure = None;
    for (&index, result) in pending.iter().zip(results) {
        let reason = match result {
            Ok(document) if document.is_ok() => {
                copies.push((index, document.id));
                continue;
            }
            Ok(document) => format!("duplication answered '{}'", document.status),
            Err(failure) => failure.to_string(),
        };
        if first_failure.is_none() {
            first_failure = Some(SupportError::ProtectedCopyFailed {
                name: staged[index].title.clone(),
                reason,
            });
        }
    }

    if let Some(error) = first_failure {
        if !copies.is_empty() {
            let orphaned: Vec<&str> = copies.iter().map(|(_, id)| id.as_str()).collect();
            tracing::warn!(
                "submission aborted, protected copies left behind: {}",
                orphaned.join(", ")
            );
        }
        return Err(error);
    }

    let count = copies.len();
    for (index, id) in copies {
        let attachment = &mut staged[index];
        tracing::debug!("document {} replaced by protected copy {}", attachment.id, id);
        attachment.id = id;
        attachment.protected = true;
    }
    Ok(count)
}
