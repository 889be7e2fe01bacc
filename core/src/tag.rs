//! Entity-type tags and the two dispatch tables.
//!
//! `EntityTag` is the closed set of six labels. Each label routes to exactly
//! one table: the singular forms to `ItemTag` (fetch by id), the plural forms
//! to `ListTag` (fetch a filtered collection). Both tables are plain enums,
//! so a missing entry is a compile error rather than a runtime fault; the
//! only runtime failure left is parsing a label that is not one of the six.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Resource category, independent of cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Character,
    Episode,
    Location,
}

impl EntityKind {
    /// Path segment of the resource under the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Episode => "episode",
            EntityKind::Location => "location",
        }
    }
}

/// One of the six entity-type labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Character,
    Episode,
    Location,
    Characters,
    Episodes,
    Locations,
}

/// Which dispatch table a tag lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Item(ItemTag),
    List(ListTag),
}

impl EntityTag {
    pub const ALL: [EntityTag; 6] = [
        EntityTag::Character,
        EntityTag::Episode,
        EntityTag::Location,
        EntityTag::Characters,
        EntityTag::Episodes,
        EntityTag::Locations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EntityTag::Character => "Character",
            EntityTag::Episode => "Episode",
            EntityTag::Location => "Location",
            EntityTag::Characters => "Characters",
            EntityTag::Episodes => "Episodes",
            EntityTag::Locations => "Locations",
        }
    }

    pub fn route(self) -> Route {
        match self {
            EntityTag::Character => Route::Item(ItemTag::Character),
            EntityTag::Episode => Route::Item(ItemTag::Episode),
            EntityTag::Location => Route::Item(ItemTag::Location),
            EntityTag::Characters => Route::List(ListTag::Characters),
            EntityTag::Episodes => Route::List(ListTag::Episodes),
            EntityTag::Locations => Route::List(ListTag::Locations),
        }
    }

    pub fn kind(self) -> EntityKind {
        match self.route() {
            Route::Item(tag) => tag.kind(),
            Route::List(tag) => tag.kind(),
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityTag {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityTag::ALL
            .into_iter()
            .find(|tag| tag.label() == s)
            .ok_or_else(|| ApiError::UnknownTag(s.to_string()))
    }
}

/// Fetch-by-id table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemTag {
    Character,
    Episode,
    Location,
}

impl ItemTag {
    pub fn kind(self) -> EntityKind {
        match self {
            ItemTag::Character => EntityKind::Character,
            ItemTag::Episode => EntityKind::Episode,
            ItemTag::Location => EntityKind::Location,
        }
    }
}

impl From<ItemTag> for EntityTag {
    fn from(tag: ItemTag) -> Self {
        match tag {
            ItemTag::Character => EntityTag::Character,
            ItemTag::Episode => EntityTag::Episode,
            ItemTag::Location => EntityTag::Location,
        }
    }
}

impl TryFrom<EntityTag> for ItemTag {
    type Error = ApiError;

    fn try_from(tag: EntityTag) -> Result<Self, Self::Error> {
        match tag.route() {
            Route::Item(item) => Ok(item),
            Route::List(_) => Err(ApiError::WrongTable { tag, expected: "item" }),
        }
    }
}

/// Fetch-collection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListTag {
    Characters,
    Episodes,
    Locations,
}

impl ListTag {
    pub fn kind(self) -> EntityKind {
        match self {
            ListTag::Characters => EntityKind::Character,
            ListTag::Episodes => EntityKind::Episode,
            ListTag::Locations => EntityKind::Location,
        }
    }
}

impl From<ListTag> for EntityTag {
    fn from(tag: ListTag) -> Self {
        match tag {
            ListTag::Characters => EntityTag::Characters,
            ListTag::Episodes => EntityTag::Episodes,
            ListTag::Locations => EntityTag::Locations,
        }
    }
}

impl TryFrom<EntityTag> for ListTag {
    type Error = ApiError;

    fn try_from(tag: EntityTag) -> Result<Self, Self::Error> {
        match tag.route() {
            Route::List(list) => Ok(list),
            Route::Item(_) => Err(ApiError::WrongTable { tag, expected: "list" }),
        }
    }
}

impl fmt::Display for ItemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&EntityTag::from(*self), f)
    }
}

impl fmt::Display for ListTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&EntityTag::from(*self), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_lives_in_exactly_one_table() {
        for tag in EntityTag::ALL {
            let in_items = ItemTag::try_from(tag).is_ok();
            let in_lists = ListTag::try_from(tag).is_ok();
            assert!(in_items ^ in_lists, "{tag} must be in exactly one table");
        }
    }

    #[test]
    fn singular_tags_are_items_plural_are_lists() {
        assert_eq!(EntityTag::Character.route(), Route::Item(ItemTag::Character));
        assert_eq!(EntityTag::Locations.route(), Route::List(ListTag::Locations));
    }

    #[test]
    fn labels_roundtrip_through_from_str() {
        for tag in EntityTag::ALL {
            assert_eq!(tag.label().parse::<EntityTag>().unwrap(), tag);
        }
    }

    #[test]
    fn unknown_label_is_a_typed_error() {
        let err = "Planets".parse::<EntityTag>().unwrap_err();
        assert!(matches!(err, ApiError::UnknownTag(ref s) if s == "Planets"));
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!("characters".parse::<EntityTag>().is_err());
    }

    #[test]
    fn wrong_table_names_the_tag() {
        let err = ListTag::try_from(EntityTag::Episode).unwrap_err();
        assert!(matches!(
            err,
            ApiError::WrongTable { tag: EntityTag::Episode, expected: "list" }
        ));
        assert_eq!(err.to_string(), "tag Episode has no entry in the list dispatch table");
    }

    #[test]
    fn kind_ignores_cardinality() {
        assert_eq!(EntityTag::Episode.kind(), EntityTag::Episodes.kind());
        assert_eq!(EntityTag::Locations.kind().path(), "location");
    }
}
