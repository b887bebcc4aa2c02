//! Turns a raw upstream payload into a sorted `ContestResult`

use serde::Deserialize;

use super::ContestResult;
use crate::contests::ContestError;

/// Upstream response envelope; keys other than `result` are ignored
#[derive(Debug, Deserialize)]
struct Envelope {
    result: ContestResult,
}

/// Deserializes a payload of the form `{ "result": ContestResult }` and sorts it
///
/// # Returns
/// * `Ok(ContestResult)` with `upcoming` soonest-first and `ongoing` later-ending first
/// * `Err(ContestError::Payload)` if the body is not valid JSON or lacks `result`
pub fn normalize(bytes: &[u8]) -> Result<ContestResult, ContestError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    let mut result = envelope.result;
    sort_contests(&mut result);
    Ok(result)
}

/// Sorts both sequences of a result in place
///
/// Both sorts are stable, so contests with equal timestamps keep their
/// upstream order. A missing timestamp sorts as the earliest instant.
pub fn sort_contests(result: &mut ContestResult) {
    result.upcoming.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    result.ongoing.sort_by(|a, b| b.end_time.cmp(&a.end_time));
}
