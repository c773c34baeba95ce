//! Item-by-item execution for `read_items` and `write_items`.
//!
//! A failing item never aborts the batch. Its slot in the result array holds
//! the failure text prefixed with [`ITEM_ERROR_PREFIX`], so the output always
//! lines up with the input.

use serde_json::Value;
use tracing::trace;

use super::errors::DispatchError;
use super::router::DISPATCH_TARGET;

/// Prefix marking a failed item in a batch result.
pub const ITEM_ERROR_PREFIX: &str = "error: ";

const RESULT_STORAGE_FAILED: &str = "unable to add a result for item";

/// Applies `op` to every element of `items`, in order.
///
/// # Errors
///
/// Returns `invalid_shape` as an invalid arguments error when `items` is not
/// an array, and an internal error when result storage cannot be allocated.
pub fn run_batch<F>(
    items: &Value,
    invalid_shape: &'static str,
    mut op: F,
) -> Result<Vec<Value>, DispatchError>
where
    F: FnMut(&Value) -> Result<Value, DispatchError>,
{
    let elements = items
        .as_array()
        .ok_or_else(|| DispatchError::invalid_arguments(invalid_shape))?;

    let mut results = Vec::new();
    results
        .try_reserve_exact(elements.len())
        .map_err(|_| DispatchError::internal(RESULT_STORAGE_FAILED))?;

    for (index, item) in elements.iter().enumerate() {
        let result = op(item).unwrap_or_else(|error| {
            trace!(target: DISPATCH_TARGET, index, %error, "batch item failed");
            item_error(&error)
        });
        results.push(result);
    }
    Ok(results)
}

fn item_error(error: &DispatchError) -> Value {
    Value::String(format!("{ITEM_ERROR_PREFIX}{error}"))
}
