//! Maps heterogeneous raw records into the canonical [`Project`] shape.
//!
//! The raw source renames fields between export versions, so every field is
//! resolved through an alias chain. Normalization fails soft: anything
//! absent or unparseable becomes `None`. The only hard error is a record
//! that is not a JSON object at all, which the batch engine skips and
//! counts.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::Project;

/// Raw project data as produced by the ingestion scraper
pub type RawRecord = serde_json::Value;

/// Date formats accepted across the raw sources, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Resolve the first alias that yields a non-empty string, trimmed.
fn string_field(data: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| {
        data.get(*key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Resolve a year field, accepting integers, floats, and numeric strings.
fn year_field(data: &Value, aliases: &[&str]) -> Option<i32> {
    aliases.iter().find_map(|key| {
        let value = data.get(*key)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .map(|y| y as i32)
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

/// Resolve a cost field, accepting numbers and numeric strings. Negative
/// values are treated as unparseable: contract cost is non-negative by
/// definition, and the missing-cost rule owns the null/zero semantics.
fn cost_field(data: &Value, key: &str) -> Option<f64> {
    let value = data.get(key)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|c| *c >= 0.0)
}

/// Parse a date string against the known formats, ignoring any time
/// component after a `T` separator. `None` when nothing matches.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or("").trim();
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Normalize one raw record into a canonical project.
///
/// Returns an error only for records that are not JSON objects; every
/// field-level problem resolves to `None` instead.
pub fn normalize_record(raw: &RawRecord) -> anyhow::Result<Project> {
    if !raw.is_object() {
        anyhow::bail!("raw record is not a JSON object");
    }
    let data = raw;

    Ok(Project {
        project_id: string_field(data, &["GlobalID", "ProjectID"]),
        project_description: string_field(data, &["ProjectDescription"]),
        year: year_field(data, &["InfraYear", "FundingYear"]),
        region: string_field(data, &["Region"]),
        province: string_field(data, &["Province"]),
        municipality: string_field(data, &["Municipality"]),
        barangay: string_field(data, &["Barangay"]),
        type_of_work: string_field(data, &["TypeofWork"]),
        contractor: string_field(data, &["Contractor"]),
        contract_cost: cost_field(data, "ContractCost"),
        contract_id: string_field(data, &["ContractID"]),
        legislative_district: string_field(data, &["LegislativeDistrict"]),
        district_engineering_office: string_field(data, &["DistrictEngineeringOffice"]),
        start_date: string_field(data, &["StartDate"]),
        completion_date: string_field(data, &["CompletionDateActual"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_full_record() {
        let raw = json!({
            "GlobalID": " P-001 ",
            "ProjectDescription": "Construction of flood mitigation structure",
            "InfraYear": 2022,
            "Region": "Region III",
            "Province": "Bulacan",
            "Municipality": "Calumpit",
            "Barangay": "Poblacion",
            "TypeofWork": "Flood Control",
            "Contractor": "SYMS CONSTRUCTION TRADING",
            "ContractCost": 9_500_000.0,
            "ContractID": "22C00123",
            "LegislativeDistrict": "1st District",
            "DistrictEngineeringOffice": "Bulacan 1st DEO",
            "StartDate": "2022-03-01",
            "CompletionDateActual": "2022-12-15"
        });

        let project = normalize_record(&raw).unwrap();
        assert_eq!(project.project_id.as_deref(), Some("P-001"));
        assert_eq!(project.year, Some(2022));
        assert_eq!(project.contract_cost, Some(9_500_000.0));
        assert_eq!(project.contract_id.as_deref(), Some("22C00123"));
    }

    #[test]
    fn project_id_falls_back_past_empty_alias() {
        let raw = json!({ "GlobalID": "  ", "ProjectID": "P-002" });
        let project = normalize_record(&raw).unwrap();
        assert_eq!(project.project_id.as_deref(), Some("P-002"));
    }

    #[test]
    fn year_accepts_numeric_string_and_funding_alias() {
        let raw = json!({ "FundingYear": "2021" });
        assert_eq!(normalize_record(&raw).unwrap().year, Some(2021));

        let raw = json!({ "InfraYear": 2023, "FundingYear": 2019 });
        assert_eq!(normalize_record(&raw).unwrap().year, Some(2023));
    }

    #[test]
    fn cost_parses_strings_and_rejects_garbage() {
        let raw = json!({ "ContractCost": "1234567.89" });
        assert_eq!(normalize_record(&raw).unwrap().contract_cost, Some(1_234_567.89));

        let raw = json!({ "ContractCost": "not a number" });
        assert_eq!(normalize_record(&raw).unwrap().contract_cost, None);

        let raw = json!({ "ContractCost": -500.0 });
        assert_eq!(normalize_record(&raw).unwrap().contract_cost, None);

        let raw = json!({ "ContractCost": 0 });
        assert_eq!(normalize_record(&raw).unwrap().contract_cost, Some(0.0));
    }

    #[test]
    fn blank_strings_become_none() {
        let raw = json!({ "Contractor": "   ", "Municipality": "" });
        let project = normalize_record(&raw).unwrap();
        assert_eq!(project.contractor, None);
        assert_eq!(project.municipality, None);
    }

    #[test]
    fn date_formats_all_parse() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 4).unwrap();
        assert_eq!(parse_flexible_date("2023-07-04"), Some(expected));
        assert_eq!(parse_flexible_date("07/04/2023"), Some(expected));
        assert_eq!(parse_flexible_date("2023/07/04"), Some(expected));
        assert_eq!(parse_flexible_date("04-07-2023"), Some(expected));
    }

    #[test]
    fn date_ignores_time_component() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 4).unwrap();
        assert_eq!(parse_flexible_date("2023-07-04T08:30:00Z"), Some(expected));
    }

    #[test]
    fn unparseable_date_is_none() {
        assert_eq!(parse_flexible_date("July 4, 2023"), None);
        assert_eq!(parse_flexible_date(""), None);
    }

    #[test]
    fn non_object_record_is_an_error() {
        assert!(normalize_record(&json!("just a string")).is_err());
        assert!(normalize_record(&json!([1, 2, 3])).is_err());
    }
}
