// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Field vocabulary per target entity.

use super::query_builder::TargetEntity;

/// Keys copied verbatim into the request object, outside the query string
pub const PASSTHROUGH_FIELDS: &[&str] = &["searchUserAccess", "searchUserName", "joined"];

/// Free-text keyword field
pub const TERM_FIELD: &str = "term";

/// Fields expected to hold date ranges
pub const DATE_FIELDS: &[&str] = &["created", "modified", "lastlogin"];

const ITEM_FIELDS: &[&str] = &[
    "id",
    "owner",
    "orgid",
    "title",
    "name",
    "type",
    "typekeywords",
    "description",
    "snippet",
    "tags",
    "categories",
    "access",
    "group",
    "culture",
    "accessinformation",
    "licenseinfo",
    "created",
    "modified",
];

const GROUP_FIELDS: &[&str] = &[
    "id",
    "owner",
    "orgid",
    "title",
    "description",
    "snippet",
    "tags",
    "typekeywords",
    "categories",
    "access",
    "isopendata",
    "isinvitationonly",
    "created",
    "modified",
];

const USER_FIELDS: &[&str] = &[
    "username",
    "fullname",
    "firstname",
    "lastname",
    "email",
    "orgid",
    "role",
    "userlicensetype",
    "provider",
    "tags",
    "access",
    "group",
    "created",
    "modified",
    "lastlogin",
];

const EVENT_FIELDS: &[&str] = &[
    "id",
    "owner",
    "orgid",
    "title",
    "tags",
    "categories",
    "access",
    "group",
    "startdatetime",
    "enddatetime",
    "created",
    "modified",
];

pub fn is_passthrough(field: &str) -> bool {
    PASSTHROUGH_FIELDS.contains(&field)
}

pub fn is_date_field(field: &str) -> bool {
    DATE_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(field))
}

/// Portal allow-list for a target entity
pub fn portal_allow_list(target: TargetEntity) -> &'static [&'static str] {
    match target {
        TargetEntity::Item => ITEM_FIELDS,
        TargetEntity::Group => GROUP_FIELDS,
        TargetEntity::User => USER_FIELDS,
        TargetEntity::Event => EVENT_FIELDS,
    }
}

/// Field name as the portal expects it for this entity
///
/// User records have no `owner`; the portal calls it `username`.
pub fn portal_field_name(target: TargetEntity, field: &str) -> &str {
    match (target, field) {
        (TargetEntity::User, "owner") => "username",
        _ => field,
    }
}

/// Case-insensitive allow-list check, after aliasing
pub fn is_portal_field(target: TargetEntity, field: &str) -> bool {
    let name = portal_field_name(target, field);
    portal_allow_list(target)
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(name))
}
