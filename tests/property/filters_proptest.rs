//! Property-based tests for request parameter helpers

use bizdesk::desk_app::api::pdf_file_name;
use bizdesk::shared::assurelog::{ExcelImportMetadata, ReportFilters};
use proptest::prelude::*;

fn maybe_empty() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-zA-Z0-9 ]{1,12}"]
}

proptest! {
    #[test]
    fn test_query_pairs_skip_empty_values(
        search in maybe_empty(),
        responsible in maybe_empty(),
        status in maybe_empty(),
        feature in maybe_empty(),
        sort_order in maybe_empty(),
    ) {
        let filters = ReportFilters {
            search,
            responsible,
            status,
            feature,
            sort_order,
            ..Default::default()
        };
        let pairs = filters.query_pairs();

        prop_assert!(pairs.iter().all(|(_, value)| !value.is_empty()));
        prop_assert_eq!(filters.is_active(), !pairs.is_empty());
        let set = [&filters.search, &filters.responsible, &filters.status, &filters.feature, &filters.sort_order]
            .iter()
            .filter(|v| !v.is_empty())
            .count();
        prop_assert_eq!(pairs.len(), set);
    }

    #[test]
    fn test_import_fields_skip_empty_values(
        report_title in maybe_empty(),
        test_environment in maybe_empty(),
        feature_scenario in maybe_empty(),
    ) {
        let metadata = ExcelImportMetadata { report_title, test_environment, feature_scenario };
        prop_assert!(metadata.fields().iter().all(|(_, value)| !value.is_empty()));
    }

    #[test]
    fn test_pdf_file_name_is_safe(title in ".*") {
        let name = pdf_file_name(Some(&title));
        prop_assert!(name.ends_with("_evidencias.pdf"));
        let stem = &name[..name.len() - "_evidencias.pdf".len()];
        prop_assert!(stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        if !title.is_empty() {
            prop_assert_eq!(stem.chars().count(), title.chars().count());
        }
    }
}
