// Uniform identifier/label pair for selection lists
use crate::error::DisplayError;
use std::cmp::Ordering;

pub trait Selectable {
    fn unique_identifier(&self) -> String;
    fn selection_display_string(&self) -> String;
}

// Ordinal comparison; blank labels are an error, never ordered first or last
pub fn compare_by_display<A, B>(a: &A, b: &B) -> Result<Ordering, DisplayError>
where
    A: Selectable + ?Sized,
    B: Selectable + ?Sized,
{
    let left = checked_display_string(a)?;
    let right = checked_display_string(b)?;
    Ok(left.cmp(&right))
}

// Slice is left untouched on error
pub fn sort_by_display<T: Selectable>(items: &mut [T]) -> Result<(), DisplayError> {
    for item in items.iter() {
        checked_display_string(item)?;
    }

    items.sort_by(|a, b| {
        a.selection_display_string()
            .cmp(&b.selection_display_string())
    });
    Ok(())
}

fn checked_display_string<T: Selectable + ?Sized>(item: &T) -> Result<String, DisplayError> {
    let label = item.selection_display_string();
    if label.trim().is_empty() {
        return Err(DisplayError::MissingDisplayString {
            identifier: item.unique_identifier(),
        });
    }
    Ok(label)
}
