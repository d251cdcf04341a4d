//! Column lists shared by the write and read sides.
//!
//! The `*_UPDATE_COLUMNS` lists are the allow-lists of columns an upsert may
//! overwrite when the row already exists. Anything not listed (notably
//! `created_at`) keeps its first-written value.

pub(crate) const USER_COLUMNS: &[&str] = &[
    "id",
    "name",
    "email",
    "status",
    "email_verified_at",
    "phone",
    "password_last_updated_at",
    "financial_institution_id",
    "created_at",
    "updated_at",
    "role",
    "signature_storage_url",
    "profile_image_storage_url",
];

pub(crate) const USER_UPDATE_COLUMNS: &[&str] = &[
    "name",
    "email",
    "status",
    "phone",
    "financial_institution_id",
    "role",
    "signature_storage_url",
    "profile_image_storage_url",
    "updated_at",
    "email_verified_at",
    "password_last_updated_at",
];

pub(crate) const AGENT_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "phone1",
    "phone2",
    "headline1",
    "headline2",
    "about",
    "is_agreement_signed",
    "agent_type",
    "bank_name",
    "account_name",
    "account_number",
    "account_type",
    "account_branch",
    "linkedin",
    "address",
    "coverage_area",
    "created_at",
    "updated_at",
];

pub(crate) const AGENT_UPDATE_COLUMNS: &[&str] = &[
    "user_id",
    "phone1",
    "phone2",
    "headline1",
    "headline2",
    "about",
    "is_agreement_signed",
    "agent_type",
    "bank_name",
    "account_name",
    "account_number",
    "account_type",
    "account_branch",
    "linkedin",
    "address",
    "coverage_area",
    "updated_at",
];

pub(crate) const LOCATION_COLUMNS: &[&str] = &[
    "id",
    "property_id",
    "region",
    "district",
    "area",
    "postcode",
    "sub_area",
    "google_map_link",
    "latitude",
    "longitude",
    "zone_category",
    "zoning",
    "created_at",
    "updated_at",
];

pub(crate) const LOCATION_UPDATE_COLUMNS: &[&str] = &[
    "property_id",
    "region",
    "district",
    "area",
    "postcode",
    "sub_area",
    "google_map_link",
    "latitude",
    "longitude",
    "zone_category",
    "zoning",
    "updated_at",
];

pub(crate) const COVER_PHOTO_COLUMNS: &[&str] = &["id", "url", "description"];

pub(crate) const COVER_PHOTO_UPDATE_COLUMNS: &[&str] = &["url", "description"];

/// Properties are insert-only, so there is no update list.
pub(crate) const PROPERTY_COLUMNS: &[&str] = &[
    "id",
    "valuer_id",
    "property_number",
    "parent_valuation",
    "project_id",
    "owner_name",
    "property_type",
    "property_design",
    "construction_stage",
    "year_built",
    "age",
    "eul",
    "rel",
    "measurements",
    "no_rooms",
    "no_of_bathrooms",
    "occupancy",
    "attributes",
    "title_deeds_available",
    "certificate_of_search_available",
    "encumbrances_available",
    "defects",
    "description",
    "master_bedroom_ensuite",
    "building_size",
    "building_size_unit",
    "land_size",
    "land_size_unit",
    "entry_type",
    "price",
    "listing_type",
    "created_by",
    "created_at",
    "updated_at",
    "is_approved",
    "is_submitted",
    "is_sale_completed",
    "has_accepted_offer",
    "is_referred",
    "approved_at",
    "visibility",
    "views",
    "agent_id",
    "cover_photo_id",
];

/// `INSERT INTO t (a, b) VALUES (?1, ?2)`
pub(crate) fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Insert keyed on `id` that overwrites only `update_columns` on conflict.
pub(crate) fn upsert_sql(table: &str, columns: &[&str], update_columns: &[&str]) -> String {
    let assignments: Vec<String> = update_columns
        .iter()
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();
    format!(
        "{} ON CONFLICT (id) DO UPDATE SET {}",
        insert_sql(table, columns),
        assignments.join(", ")
    )
}

/// `SELECT a, b FROM t` with every column qualified by `alias`.
pub(crate) fn select_list(alias: &str, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_sql_shape() {
        let sql = upsert_sql("cover_photos", COVER_PHOTO_COLUMNS, COVER_PHOTO_UPDATE_COLUMNS);
        assert_eq!(
            sql,
            "INSERT INTO cover_photos (id, url, description) VALUES (?1, ?2, ?3) \
             ON CONFLICT (id) DO UPDATE SET url = excluded.url, description = excluded.description"
        );
    }

    #[test]
    fn test_update_lists_are_subsets() {
        for (all, update) in [
            (USER_COLUMNS, USER_UPDATE_COLUMNS),
            (AGENT_COLUMNS, AGENT_UPDATE_COLUMNS),
            (LOCATION_COLUMNS, LOCATION_UPDATE_COLUMNS),
            (COVER_PHOTO_COLUMNS, COVER_PHOTO_UPDATE_COLUMNS),
        ] {
            for column in update {
                assert!(all.contains(column), "{column} missing from insert list");
            }
            assert!(!update.contains(&"id"));
            assert!(!update.contains(&"created_at"));
        }
    }

    #[test]
    fn test_select_list_qualifies() {
        assert_eq!(select_list("c", &["id", "url"]), "c.id, c.url");
    }
}
