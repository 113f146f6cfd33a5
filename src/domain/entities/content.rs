use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::entities::{document::Collection, language::Language};

/// A record type stored in one collection of the document store.
///
/// `New` is the draft shape (everything the caller may write on creation),
/// `Patch` the partial-update shape. A full draft converts into a patch that
/// overwrites every writable field.
pub trait ContentEntity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    type New: Serialize + DeserializeOwned + Validate + DraftLists + Clone + Debug + PartialEq + Send + Sync + 'static;
    type Patch: Serialize + DeserializeOwned + Validate + Default + Debug + Send + Sync + From<Self::New> + 'static;

    const COLLECTION: Collection;

    fn id(&self) -> &str;
    fn language(&self) -> Language;
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Empty draft for the add flow, with the editor's defaults filled in.
    fn blank_draft(language: Language) -> Self::New;

    /// Draft pre-filled from this entity, for the edit flow.
    fn to_draft(&self) -> Self::New;

    /// Rebuilds an entity from a committed draft.
    fn from_draft(
        id: String,
        draft: Self::New,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self;
}

/// Ordered list fields of a draft, edited row by row.
pub trait DraftLists {
    const LIST_FIELDS: &'static [&'static str];

    fn list_mut(&mut self, field: &str) -> Option<&mut Vec<String>>;
}

/// Splits delimiter-joined text into trimmed, non-empty items.
///
/// Lossy: an item that itself contains the delimiter is split apart.
/// Kept for bulk paste into a list field; row edits are the primary path.
pub fn split_list(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(split_list(" ABB, Hager,,  Siemens ", ','), vec!["ABB", "Hager", "Siemens"]);
        assert_eq!(split_list("one\n\n two \n", '\n'), vec!["one", "two"]);
        assert!(split_list("  ", ',').is_empty());
    }

    #[test]
    fn split_list_is_lossy_for_items_containing_the_delimiter() {
        let items = split_list("Kabli NYM-J (Nexans, Prysmian)", ',');
        assert_eq!(items.len(), 2);
    }
}
