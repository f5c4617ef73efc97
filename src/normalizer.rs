/// Sentinel region value meaning "no filter".
pub const ALL_REGIONS: &str = "All";

/// Turns a user-facing region selection into an optional filter.
/// Blank input and the exact `All` sentinel both mean no filter; other
/// casings are ordinary region names.
pub fn normalize_region_filter(selection: Option<&str>) -> Option<&str> {
    let region = selection?.trim();
    if region.is_empty() || region == ALL_REGIONS {
        return None;
    }
    Some(region)
}

/// Label used in logs and reports for a selection.
pub fn region_label(selection: Option<&str>) -> &str {
    normalize_region_filter(selection).unwrap_or(ALL_REGIONS)
}
